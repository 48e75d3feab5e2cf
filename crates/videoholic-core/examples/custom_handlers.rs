//! Custom handler example
//!
//! Registers a source handler for a private URL scheme and an HLS engine,
//! then switches between sources on a headless surface.
//!
//! Run with: cargo run -p videoholic-core --example custom_handlers

use std::rc::Rc;

use videoholic_core::{
    Capabilities, ControllerConfig, EngineError, EngineFactory, EngineSession, HeadlessSurface,
    MediaSource, MediaSourceHandler, MediaStream, MediaStreamHandler, MediaStreamType,
    PlayerController, PlayerEvent, RenderingSurface, Result, StreamEngines,
};

/// Maps `vod://<id>` to the CDN's HLS playlist for that id
struct VodSchemeHandler {
    cdn: &'static str,
}

impl MediaSourceHandler for VodSchemeHandler {
    fn name(&self) -> &str {
        "vod-scheme"
    }

    fn can_handle_source(&self, src: &MediaSource) -> bool {
        matches!(src, MediaSource::Url(url) if url.starts_with("vod://"))
    }

    fn get_media_stream(&self, src: &MediaSource) -> Result<MediaStream> {
        let id = src.to_string().trim_start_matches("vod://").to_string();
        Ok(MediaStream::new(
            MediaStreamType::Hls,
            format!("{}/{}/master.m3u8", self.cdn, id),
        ))
    }
}

/// Engine that only prints what a real MSE engine would do
struct PrintingEngine;

impl EngineFactory for PrintingEngine {
    fn name(&self) -> &str {
        "printing"
    }

    fn create(&self) -> Box<dyn EngineSession> {
        Box::new(PrintingSession)
    }
}

struct PrintingSession;

impl EngineSession for PrintingSession {
    fn load_source(&mut self, url: &str) -> std::result::Result<(), EngineError> {
        println!("  [engine] loading {}", url);
        Ok(())
    }

    fn attach_media(&mut self, surface: &dyn RenderingSurface) -> std::result::Result<(), EngineError> {
        println!("  [engine] attached to surface {}", surface.id());
        Ok(())
    }

    fn destroy(&mut self, _surface: &dyn RenderingSurface) {
        println!("  [engine] destroyed, buffers released");
    }
}

fn main() -> anyhow::Result<()> {
    println!("Videoholic Core - Custom Handlers Example");
    println!("==========================================\n");

    // A desktop browser: MSE and progressive MP4/WEBM, no native HLS
    let caps = Capabilities {
        mse: true,
        mp4: true,
        webm: true,
        ..Capabilities::none()
    };
    let engines = StreamEngines::new().with_hls(PrintingEngine);
    let mut controller = PlayerController::with_engines(ControllerConfig::new(caps), engines)?;

    controller.register_source_handler(Box::new(VodSchemeHandler {
        cdn: "https://cdn.example.com/vod",
    }));

    println!("Stream handlers (priority order):");
    for handler in controller.stream_handlers() {
        println!("  - {}", handler.name());
    }
    println!();

    let mut events = controller.subscribe();
    let surface = Rc::new(HeadlessSurface::new());
    controller.set_surface(surface.clone())?;

    for src in ["vod://episode-42", "trailer.mp4", "clip.webm"] {
        println!("Assigning {}", src);
        controller.set_source(src.into())?;
        if let Some(handler) = controller.attached_handler() {
            println!("  attached: {}\n", handler.name());
        }
    }

    controller.play()?;
    surface.set_current_time(4.2);

    while let Ok(event) = events.try_recv() {
        if let PlayerEvent::Playback { kind, state } = event {
            println!("event {:?} at {:.1}s ({})", kind, state.current_time, state.status);
        }
    }

    if let Err(e) = controller.set_source("archive.avi".into()) {
        println!("\nExpected failure: {}", e);
    }

    Ok(())
}
