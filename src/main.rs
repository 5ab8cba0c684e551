mod app;
mod scaffold;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Chain-tree JSON to lay out in a frozen panel next to the builder.
    #[arg(long)]
    tree: Option<String>,
}

fn main() -> eframe::Result<()> {
    let args = Args::parse();
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1240.0, 560.0]),
        ..Default::default()
    };

    eframe::run_native(
        "ubi-scaffold",
        options,
        Box::new(move |cc| Ok(Box::new(app::ScaffoldApp::new(cc, args.tree.clone())))),
    )
}
