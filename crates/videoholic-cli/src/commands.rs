//! CLI command implementations

use crate::output::{self, HandlerRow, OutputFormat, ResolveReport};
use anyhow::Context;
use console::style;
use std::path::Path;
use std::rc::Rc;
use tabled::Table;
use tracing::{debug, info};
use videoholic_core::{
    Capabilities, ControllerConfig, EngineError, EngineFactory, EngineSession, HeadlessSurface,
    MediaSource, MediaSourceHandler, MediaStreamHandler, PlayerController, RenderingSurface,
    StreamEngines,
};

/// Build the controller config from a JSON file or a capability list
pub fn load_config(path: Option<&Path>, caps: &str) -> anyhow::Result<ControllerConfig> {
    if let Some(path) = path {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        return Ok(ControllerConfig::from_json(&json)?);
    }
    Ok(ControllerConfig::new(parse_capabilities(caps)?))
}

/// Parse "all", "none", or a comma list of capability flags
pub fn parse_capabilities(list: &str) -> anyhow::Result<Capabilities> {
    match list.trim() {
        "all" => return Ok(Capabilities::all()),
        "none" | "" => return Ok(Capabilities::none()),
        _ => {}
    }

    let mut caps = Capabilities::none();
    for flag in list.split(',').map(str::trim).filter(|f| !f.is_empty()) {
        match flag.to_lowercase().as_str() {
            "mse" => caps.mse = true,
            "hls" => caps.hls = true,
            "dash" => caps.dash = true,
            "mp4" => caps.mp4 = true,
            "webm" => caps.webm = true,
            other => anyhow::bail!("unknown capability flag: {}", other),
        }
    }
    Ok(caps)
}

/// Engine that records what it would do instead of buffering media
struct DryRunEngine {
    name: &'static str,
}

impl EngineFactory for DryRunEngine {
    fn name(&self) -> &str {
        self.name
    }

    fn create(&self) -> Box<dyn EngineSession> {
        Box::new(DryRunSession { engine: self.name })
    }
}

struct DryRunSession {
    engine: &'static str,
}

impl EngineSession for DryRunSession {
    fn load_source(&mut self, url: &str) -> Result<(), EngineError> {
        debug!(engine = self.engine, url, "Engine load");
        Ok(())
    }

    fn attach_media(&mut self, surface: &dyn RenderingSurface) -> Result<(), EngineError> {
        debug!(engine = self.engine, surface = %surface.id(), "Engine attach");
        Ok(())
    }

    fn destroy(&mut self, _surface: &dyn RenderingSurface) {
        debug!(engine = self.engine, "Engine destroy");
    }
}

fn controller(config: ControllerConfig) -> anyhow::Result<PlayerController> {
    let engines = StreamEngines::new()
        .with_hls(DryRunEngine { name: "dry-run-hls" })
        .with_dash(DryRunEngine { name: "dry-run-dash" });
    Ok(PlayerController::with_engines(config, engines)?)
}

/// Ask the server for the Content-Type of a URL
async fn probe_mime(url: &str) -> anyhow::Result<Option<String>> {
    let client = reqwest::Client::new();
    let response = client
        .head(url)
        .send()
        .await
        .with_context(|| format!("HEAD {} failed", url))?;

    let mime = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(';').next().unwrap_or(v).trim().to_string())
        .filter(|v| !v.is_empty());

    debug!(url, status = %response.status(), mime = ?mime, "Probed content type");
    Ok(mime)
}

/// Resolve a source and attach it to a headless surface
pub async fn resolve(
    config: ControllerConfig,
    source: &str,
    mime: Option<String>,
    probe: bool,
    format: &str,
) -> anyhow::Result<()> {
    let mime = if probe { probe_mime(source).await? } else { mime };

    let src = match &mime {
        Some(mime) => MediaSource::typed(source, mime.clone()),
        None => MediaSource::url(source),
    };

    let mut controller = controller(config)?;
    let resolution = controller.resolve(&src)?;

    let surface = Rc::new(HeadlessSurface::new());
    controller.set_surface(surface.clone())?;
    controller.set_source(src)?;
    info!(handler = resolution.stream_handler.name(), "Source attached");

    let report = ResolveReport {
        source: source.to_string(),
        mime_hint: mime,
        source_handler: resolution.source_handler,
        stream_type: resolution.stream.stream_type.to_string(),
        stream_url: resolution
            .stream
            .url
            .as_url()
            .unwrap_or("<media object>")
            .to_string(),
        stream_handler: resolution.stream_handler.name().to_string(),
        surface_src: surface.src(),
    };

    match OutputFormat::from(format) {
        OutputFormat::Json => output::print_json(&report)?,
        OutputFormat::Text => output::print_resolve_report(&report),
    }

    controller.teardown();
    Ok(())
}

/// List source and stream handlers in priority order
pub fn handlers(config: ControllerConfig, format: &str) -> anyhow::Result<()> {
    let controller = controller(config)?;

    let mut rows: Vec<HandlerRow> = controller
        .source_handlers()
        .iter()
        .enumerate()
        .map(|(i, h)| HandlerRow {
            priority: i + 1,
            registry: "source",
            name: h.name().to_string(),
        })
        .collect();
    rows.extend(
        controller
            .stream_handlers()
            .iter()
            .enumerate()
            .map(|(i, h)| HandlerRow {
                priority: i + 1,
                registry: "stream",
                name: h.name().to_string(),
            }),
    );

    match OutputFormat::from(format) {
        OutputFormat::Json => output::print_json(&rows)?,
        OutputFormat::Text => println!("{}", Table::new(rows)),
    }
    Ok(())
}

/// Show the effective capability flags
pub fn capabilities(config: &ControllerConfig, format: &str) -> anyhow::Result<()> {
    let caps = &config.capabilities;

    match OutputFormat::from(format) {
        OutputFormat::Json => output::print_json(caps)?,
        OutputFormat::Text => {
            println!("{}", style("Capabilities:").bold());
            for (name, enabled) in [
                ("mse", caps.mse),
                ("hls", caps.hls),
                ("dash", caps.dash),
                ("mp4", caps.mp4),
                ("webm", caps.webm),
            ] {
                let mark = if enabled {
                    style("yes").green()
                } else {
                    style("no").red()
                };
                println!("  {:6} {}", name, mark);
            }
        }
    }
    Ok(())
}
