use std::collections::{HashMap, HashSet};
use std::f32::consts::FRAC_PI_4;

use super::lattice::{ADJACENT_SPAN, LatticeGraph};
use super::linkage::{Linkage, ProtectKind};
use super::model::{Arrow, AssemblyModel, Marker, MarkerState};
use super::tree::{ChainTree, Children};

/// Distance from a slot's center to the protecting-group markers around it.
const MARKER_OFFSET: f32 = 25.0;

/// Lays a chain tree onto the lattice without user interaction, producing
/// the same model shape the interactive builder does. Deterministic:
/// candidate slots are always scanned in slot-index order, so equal inputs
/// yield identical output. Branches that find no free slot are dropped
/// silently together with their subtrees; the result is best-effort but
/// the arrow and activation invariants always hold.
pub fn layout_tree(tree: &ChainTree, lattice: &LatticeGraph) -> AssemblyModel {
    let mut model = AssemblyModel::empty(lattice.len());
    if lattice.is_empty() {
        return model;
    }

    let mut used = HashSet::from([0usize]);
    let mut first_slot = HashMap::new();
    place_chain(tree, 0, lattice, &mut model, &mut used, &mut first_slot);
    model
}

/// Depth-first preorder placement of one chain and its subtrees.
fn place_chain(
    chain: &ChainTree,
    at: usize,
    lattice: &LatticeGraph,
    model: &mut AssemblyModel,
    used: &mut HashSet<usize>,
    first_slot: &mut HashMap<u32, usize>,
) {
    model.activations[at] = 1;
    first_slot.entry(chain.chain_id).or_insert(at);

    for site in &chain.branch_sites {
        let Children::Chain(sub) = &site.children else {
            continue;
        };
        // Sites outside the two directional linkages never place.
        let Some(linkage) = Linkage::from_site(&site.site) else {
            continue;
        };
        let Some(next) = branch_slot(lattice, at, used, linkage) else {
            continue;
        };
        model.arrows.push(Arrow {
            from: at,
            to: next,
            linkage: Some(Linkage::classify(lattice.pos(at), lattice.pos(next))),
        });
        used.insert(next);
        place_chain(sub, next, lattice, model, used, first_slot);
    }

    // A chain id met again after its first placement occupies more than
    // one slot along its own backbone: extend the original slot upward
    // with one neutral arrow.
    if let Some(&origin) = first_slot.get(&chain.chain_id)
        && origin != at
        && let Some(next) = continuation_slot(lattice, origin, used)
    {
        model.arrows.push(Arrow {
            from: origin,
            to: next,
            linkage: None,
        });
        used.insert(next);
    }

    for site in &chain.branch_sites {
        let Children::Protect(kind) = &site.children else {
            continue;
        };
        let angle = if site.site == "K48" {
            -FRAC_PI_4
        } else {
            FRAC_PI_4
        };
        let pos = lattice.pos(at);
        model.markers.push(Marker {
            x: pos.x + angle.sin() * MARKER_OFFSET,
            y: pos.y - angle.cos() * MARKER_OFFSET,
            state: match kind {
                ProtectKind::Aboc => MarkerState::Aboc,
                ProtectKind::Smac => MarkerState::Smac,
            },
        });
    }
}

/// First free slot one layer above `from`, adjacent, within the lattice's
/// horizontal reach, on the side the linkage extends toward.
fn branch_slot(
    lattice: &LatticeGraph,
    from: usize,
    used: &HashSet<usize>,
    linkage: Linkage,
) -> Option<usize> {
    let origin = lattice.pos(from);
    let layer = lattice.layer_of(from);
    (0..lattice.len()).find(|&id| {
        if used.contains(&id) {
            return false;
        }
        let dx = lattice.pos(id).x - origin.x;
        lattice.layer_of(id) == layer + 1
            && dx.abs() <= ADJACENT_SPAN
            && dx * linkage.direction() > 0.0
            && lattice.adjacent(from, id)
    })
}

/// First free slot one layer above `origin`, within the horizontal reach;
/// the continuation does not require lattice adjacency.
fn continuation_slot(
    lattice: &LatticeGraph,
    origin: usize,
    used: &HashSet<usize>,
) -> Option<usize> {
    let origin_pos = lattice.pos(origin);
    let layer = lattice.layer_of(origin);
    (0..lattice.len()).find(|&id| {
        !used.contains(&id)
            && lattice.layer_of(id) == layer + 1
            && (lattice.pos(id).x - origin_pos.x).abs() <= ADJACENT_SPAN
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scaffold::tree::{parse_chain_tree, BranchSite};

    fn lattice() -> LatticeGraph {
        LatticeGraph::pentamer()
    }

    fn chain(id: u32, sites: Vec<BranchSite>) -> ChainTree {
        ChainTree {
            chain_id: id,
            branch_sites: sites,
        }
    }

    fn branch(site: &str, children: Children) -> BranchSite {
        BranchSite {
            site: site.to_string(),
            children,
        }
    }

    fn nested(id: u32) -> Children {
        Children::Chain(Box::new(chain(id, Vec::new())))
    }

    #[test]
    fn single_k48_dimer_places_one_leftward_arrow() {
        let tree = chain(1, vec![branch("K48", nested(2))]);
        let model = layout_tree(&tree, &lattice());

        assert_eq!(model.total_activation(), 2);
        assert_eq!(model.activations[0], 1);
        assert_eq!(model.activations[1], 1);
        assert_eq!(
            model.arrows,
            vec![Arrow {
                from: 0,
                to: 1,
                linkage: Some(Linkage::K48),
            }]
        );
        assert!(model.markers.is_empty());
    }

    #[test]
    fn k63_branches_place_rightward() {
        let tree = chain(1, vec![branch("K63", nested(2))]);
        let model = layout_tree(&tree, &lattice());
        assert_eq!(
            model.arrows,
            vec![Arrow {
                from: 0,
                to: 2,
                linkage: Some(Linkage::K63),
            }]
        );
    }

    #[test]
    fn protecting_tags_become_markers_not_arrows() {
        let tree = chain(
            1,
            vec![
                branch("K48", Children::Protect(ProtectKind::Aboc)),
                branch("K63", Children::Protect(ProtectKind::Smac)),
            ],
        );
        let model = layout_tree(&tree, &lattice());

        assert!(model.arrows.is_empty());
        assert_eq!(model.markers.len(), 2);

        let offset = MARKER_OFFSET * FRAC_PI_4.sin();
        let aboc = model.markers[0];
        assert_eq!(aboc.state, MarkerState::Aboc);
        assert!((aboc.x - (300.0 - offset)).abs() < 1e-3);
        assert!((aboc.y - (300.0 - offset)).abs() < 1e-3);

        let smac = model.markers[1];
        assert_eq!(smac.state, MarkerState::Smac);
        assert!((smac.x - (300.0 + offset)).abs() < 1e-3);
        assert!((smac.y - (300.0 - offset)).abs() < 1e-3);
    }

    #[test]
    fn non_directional_sites_place_nothing_and_do_not_disturb_siblings() {
        let tree = chain(
            1,
            vec![
                branch("K6", nested(2)),
                branch("M1", nested(3)),
                branch("K63", nested(4)),
            ],
        );
        let model = layout_tree(&tree, &lattice());

        assert_eq!(model.arrows.len(), 1);
        assert_eq!(model.arrows[0].to, 2);
        assert_eq!(model.total_activation(), 2);
        assert!(model.markers.is_empty());
    }

    #[test]
    fn unplaceable_branch_drops_its_whole_subtree_silently() {
        // Two K48 branches from the root: the first claims slot 1, the
        // second finds no free leftward slot and vanishes with its subtree.
        let deep = Children::Chain(Box::new(chain(
            3,
            vec![branch("K48", nested(4))],
        )));
        let tree = chain(1, vec![branch("K48", nested(2)), branch("K48", deep)]);
        let model = layout_tree(&tree, &lattice());

        assert_eq!(model.arrows.len(), 1);
        assert_eq!(model.total_activation(), 2);
    }

    #[test]
    fn preorder_nesting_walks_up_the_lattice() {
        let tree = chain(
            1,
            vec![branch(
                "K48",
                Children::Chain(Box::new(chain(2, vec![branch("K63", nested(3))]))),
            )],
        );
        let model = layout_tree(&tree, &lattice());

        // Root -> 1 (K48, leftward), then 1 -> 4 (K63, rightward).
        assert_eq!(
            model.arrows,
            vec![
                Arrow {
                    from: 0,
                    to: 1,
                    linkage: Some(Linkage::K48),
                },
                Arrow {
                    from: 1,
                    to: 4,
                    linkage: Some(Linkage::K63),
                },
            ]
        );
        assert_eq!(model.total_activation(), 3);
    }

    #[test]
    fn repeated_chain_id_extends_the_backbone_with_a_neutral_arrow() {
        // The same chain id shows up again one level into the tree: its
        // original slot grows a gray continuation upward.
        let tree = chain(
            2,
            vec![branch(
                "K63",
                Children::Chain(Box::new(chain(2, Vec::new()))),
            )],
        );
        let model = layout_tree(&tree, &lattice());

        assert_eq!(model.arrows.len(), 2);
        assert_eq!(
            model.arrows[0],
            Arrow {
                from: 0,
                to: 2,
                linkage: Some(Linkage::K63),
            }
        );
        // Continuation from slot 0: first free slot one layer up is 1.
        assert_eq!(
            model.arrows[1],
            Arrow {
                from: 0,
                to: 1,
                linkage: None,
            }
        );
    }

    #[test]
    fn layout_is_deterministic() {
        let tree = parse_chain_tree(
            r#"{"chain_number": 1, "branching_sites": [
                {"site_name": "K48", "children": {
                    "chain_number": 2,
                    "branching_sites": [
                        {"site_name": "K63", "children": {"chain_number": 3, "branching_sites": []}},
                        {"site_name": "K48", "children": "ABOC"}
                    ]
                }},
                {"site_name": "K63", "children": {"chain_number": 4, "branching_sites": []}}
            ]}"#,
        )
        .unwrap();

        let lattice = lattice();
        let first = layout_tree(&tree, &lattice);
        let second = layout_tree(&tree, &lattice);
        assert_eq!(first, second);
        assert_eq!(first.total_activation(), 4);
        assert_eq!(first.markers.len(), 1);
    }
}
