use anyhow::Result;
use joist_config::JoistConfig;
use joist_host::{FileSource, HostContext, ViewModel};
use joist_scene::{HeuristicMeasurer, Size, display_list, layout};

fn main() -> Result<()> {
    let _ = env_logger::try_init();

    // Load configuration, then let flags override it
    let mut config = JoistConfig::load();
    if std::env::args().any(|a| a == "--dev") {
        config.runtime.development = true;
    }
    let name = std::env::args()
        .skip(1)
        .find(|a| !a.starts_with("--"))
        .unwrap_or_else(|| "home".to_string());

    // Resolve the document source from the configured directories
    let mut source =
        FileSource::new(&config.documents.bundle_dir).development(config.runtime.development);
    if let Some(cache) = &config.documents.cache_dir {
        source = source.with_cache_dir(cache);
    }

    let mut host = HostContext::new(Box::new(source), config.runtime.development);
    host.set_base_font_size(config.text.base_font_size);

    let mut screen = ViewModel::new(&name);

    // Build once and lay the screen out against the configured viewport
    let tree = screen.build(&mut host);
    let viewport = Size { width: config.viewport.width, height: config.viewport.height };
    let result = layout(&tree, viewport, &HeuristicMeasurer);

    println!(
        "{} @ {}x{} ({} nodes)",
        name,
        viewport.width,
        viewport.height,
        tree.count()
    );
    dump(&result.root, 0);

    for diagnostic in &result.diagnostics {
        eprintln!("diagnostic: {diagnostic:?}");
    }

    let painted = display_list(&result.root);
    println!("{} painted items", painted.len());
    Ok(())
}

/// Indented frame tree dump, one line per frame.
fn dump(frame: &joist_scene::Frame, depth: usize) {
    let indent = "  ".repeat(depth);
    let id = frame.id.as_deref().unwrap_or("-");
    println!(
        "{indent}{id} ({:.1}, {:.1}) {:.1}x{:.1} z={:.1} a={:.2}",
        frame.rect.x, frame.rect.y, frame.rect.width, frame.rect.height, frame.z, frame.opacity
    );
    for child in &frame.children {
        dump(child, depth + 1);
    }
}
