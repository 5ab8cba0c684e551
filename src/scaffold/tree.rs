use std::path::Path;

use anyhow::{Context, Result};
use serde::de::Deserializer;
use serde::Deserialize;
use serde_json::Value;

use super::linkage::ProtectKind;

/// Externally supplied nested description of how chain units connect,
/// as produced by the assembly-planning service. Field names follow its
/// JSON; fields this dashboard does not display (FASTA sequence, chain
/// length, protein label, ...) are ignored.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ChainTree {
    #[serde(default, rename = "chain_number")]
    pub chain_id: u32,
    #[serde(default, rename = "branching_sites")]
    pub branch_sites: Vec<BranchSite>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct BranchSite {
    #[serde(default, rename = "site_name")]
    pub site: String,
    #[serde(default)]
    pub children: Children,
}

/// The three-way `children` field of a branch site: nothing attached, a
/// nested chain, or a protecting-group tag. Modeled as an explicit
/// variant so the layout walk is exhaustive instead of shape-sniffing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Children {
    #[default]
    Empty,
    Chain(Box<ChainTree>),
    Protect(ProtectKind),
}

impl<'de> Deserialize<'de> for Children {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            // A nested object that fails to decode degrades to an empty
            // site so the rest of the tree still lays out.
            Value::Object(_) => serde_json::from_value::<ChainTree>(value)
                .map(|chain| Self::Chain(Box::new(chain)))
                .unwrap_or(Self::Empty),
            Value::String(tag) => match tag.as_str() {
                "SMAC" => Self::Protect(ProtectKind::Smac),
                "ABOC" => Self::Protect(ProtectKind::Aboc),
                _ => Self::Empty,
            },
            _ => Self::Empty,
        })
    }
}

pub fn parse_chain_tree(raw: &str) -> Result<ChainTree> {
    serde_json::from_str(raw).context("invalid chain-tree JSON")
}

pub fn load_chain_tree(path: &Path) -> Result<ChainTree> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read chain tree {}", path.display()))?;
    parse_chain_tree(&raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_the_service_shape_with_extra_fields() {
        let tree = parse_chain_tree(
            r#"{
                "protein": "1ubq-histag",
                "chain_number": 1,
                "FASTA_sequence": "MQIFVKTLTG",
                "chain_length": 83,
                "branching_sites": [
                    {"site_name": "M1", "sequence_id": "(M)QIF", "children": ""},
                    {"site_name": "K48", "children": {"chain_number": 2, "branching_sites": []}},
                    {"site_name": "K63", "children": "SMAC"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(tree.chain_id, 1);
        assert_eq!(tree.branch_sites.len(), 3);
        assert_eq!(tree.branch_sites[0].children, Children::Empty);
        assert_eq!(
            tree.branch_sites[1].children,
            Children::Chain(Box::new(ChainTree {
                chain_id: 2,
                branch_sites: Vec::new(),
            }))
        );
        assert_eq!(
            tree.branch_sites[2].children,
            Children::Protect(ProtectKind::Smac)
        );
    }

    #[test]
    fn missing_fields_degrade_instead_of_erroring() {
        let tree = parse_chain_tree("{}").unwrap();
        assert_eq!(tree.chain_id, 0);
        assert!(tree.branch_sites.is_empty());

        let tree = parse_chain_tree(
            r#"{"chain_number": 1, "branching_sites": [{"children": "ABOC"}]}"#,
        )
        .unwrap();
        assert_eq!(tree.branch_sites[0].site, "");
        assert_eq!(
            tree.branch_sites[0].children,
            Children::Protect(ProtectKind::Aboc)
        );
    }

    #[test]
    fn unknown_tags_and_shapes_are_treated_as_empty() {
        let tree = parse_chain_tree(
            r#"{"chain_number": 1, "branching_sites": [
                {"site_name": "K48", "children": "BOC?"},
                {"site_name": "K63", "children": 7},
                {"site_name": "K6", "children": null}
            ]}"#,
        )
        .unwrap();
        for site in &tree.branch_sites {
            assert_eq!(site.children, Children::Empty);
        }
    }

    #[test]
    fn syntax_errors_still_surface() {
        assert!(parse_chain_tree("not json").is_err());
    }
}
