use anyhow::{Context, anyhow, bail};
use clap::{ArgAction, Parser};
use sketchbook::canvas::{Canvas, SketchCanvas};
use sketchbook::session::SaveOutcome;
use sketchbook::util::color_to_name;
use sketchbook::{Config, Workspace};
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "sketchbook")]
#[command(version, about = "Freehand drawing gallery and session manager")]
struct Cli {
    /// List stored drawings, most recently modified first
    #[arg(long, short = 'l', action = ArgAction::SetTrue)]
    list: bool,

    /// Show details for one drawing
    #[arg(long, value_name = "ID")]
    info: Option<Uuid>,

    /// Write a drawing's preview image as PNG (requires --output)
    #[arg(long, value_name = "ID", requires = "output")]
    export_thumbnail: Option<Uuid>,

    /// Destination for --export-thumbnail
    #[arg(long, short = 'o', value_name = "PATH")]
    output: Option<PathBuf>,

    /// Delete a drawing (no-op if it does not exist)
    #[arg(long, value_name = "ID")]
    delete: Option<Uuid>,

    /// Rename a drawing (requires --title)
    #[arg(long, value_name = "ID", requires = "title")]
    rename: Option<Uuid>,

    /// New title for --rename
    #[arg(long, value_name = "TITLE")]
    title: Option<String>,

    /// Create an empty drawing with the given title
    #[arg(long, value_name = "TITLE")]
    new: Option<String>,

    /// Print the stored tool preferences
    #[arg(long, action = ArgAction::SetTrue)]
    show_settings: bool,

    /// Restore tool preferences to the configured defaults
    #[arg(long, action = ArgAction::SetTrue)]
    reset_settings: bool,

    /// Write a documented default config file
    #[arg(long, action = ArgAction::SetTrue)]
    init_config: bool,
}

impl Cli {
    fn has_action(&self) -> bool {
        self.list
            || self.info.is_some()
            || self.export_thumbnail.is_some()
            || self.delete.is_some()
            || self.rename.is_some()
            || self.new.is_some()
            || self.show_settings
            || self.reset_settings
            || self.init_config
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    if !cli.has_action() {
        print_usage();
        return Ok(());
    }

    if cli.init_config {
        let path = Config::create_default_file()?;
        println!("Wrote default config to {}", path.display());
    }

    let config = Config::load().unwrap_or_else(|err| {
        log::warn!("Failed to load config, using defaults: {:#}", err);
        Config::default()
    });
    let mut workspace = Workspace::open(config)?;

    if let Some(title) = &cli.new {
        let mut session = workspace.new_session(SketchCanvas::new());
        match session.save_as(workspace.gallery_mut(), title)? {
            SaveOutcome::Saved { id, .. } => println!("{id}"),
            SaveOutcome::TitleRequired => bail!("a non-placeholder title is required"),
        }
    }

    if let (Some(id), Some(title)) = (cli.rename, &cli.title) {
        workspace.rename(id, title)?;
        println!("Renamed {id}");
    }

    if let Some(id) = cli.delete {
        if workspace.delete(id)? {
            println!("Deleted {id}");
        } else {
            println!("No drawing with id {id}");
        }
    }

    if let (Some(id), Some(output)) = (cli.export_thumbnail, &cli.output) {
        let record = workspace
            .fetch(id)?
            .ok_or_else(|| anyhow!("no drawing with id {id}"))?;
        let png = match record.thumbnail {
            Some(png) => png,
            None => {
                log::info!("Drawing {} has no stored preview, rendering one", id);
                let mut canvas = SketchCanvas::new();
                canvas.decode(&record.drawing_data)?;
                canvas.render_preview(workspace.gallery().options().thumbnail_size)?
            }
        };
        std::fs::write(output, &png)
            .with_context(|| format!("Failed to write {}", output.display()))?;
        println!("Wrote {} ({} bytes)", output.display(), png.len());
    }

    if let Some(id) = cli.info {
        let record = workspace
            .fetch(id)?
            .ok_or_else(|| anyhow!("no drawing with id {id}"))?;
        let mut canvas = SketchCanvas::new();
        let strokes = match canvas.decode(&record.drawing_data) {
            Ok(()) => canvas.strokes().len().to_string(),
            Err(err) => format!("unreadable ({err})"),
        };
        println!("id:        {}", record.id);
        println!("title:     {}", record.title);
        println!("created:   {}", record.created.to_rfc3339());
        println!("modified:  {}", record.modified.to_rfc3339());
        println!("size:      {} bytes", record.drawing_data.len());
        println!("strokes:   {strokes}");
        println!(
            "thumbnail: {}",
            if record.thumbnail.is_some() { "yes" } else { "no" }
        );
    }

    if cli.list {
        let records = workspace.list()?;
        if records.is_empty() {
            println!("No drawings yet.");
        }
        for record in records {
            println!(
                "{}  {}  {}",
                record.id,
                record.modified.format("%Y-%m-%d %H:%M"),
                record.title
            );
        }
    }

    if cli.reset_settings {
        workspace.settings().reset();
        println!("Preferences reset to defaults");
    }

    if cli.show_settings {
        let settings = workspace.settings();
        let tools = settings.load();
        let (x, y) = tools.transform.offset();
        println!("preferences:   {}", settings.path().display());
        println!("color:         {}", color_to_name(&tools.color));
        println!("line width:    {}", tools.line_width);
        println!("eraser width:  {}", tools.eraser_width);
        println!("eraser active: {}", tools.eraser_active);
        println!("toolbar:       {}", tools.toolbar_visible);
        println!("zoom:          {}", tools.transform.zoom());
        println!("pan offset:    ({x}, {y})");
        match settings.last_opened() {
            Some(id) => println!("last opened:   {id}"),
            None => println!("last opened:   none"),
        }
    }

    Ok(())
}

fn print_usage() {
    println!("sketchbook: Freehand drawing gallery and session manager");
    println!();
    println!("Usage:");
    println!("  sketchbook --list                      List drawings");
    println!("  sketchbook --new <TITLE>               Create an empty drawing");
    println!("  sketchbook --info <ID>                 Show drawing details");
    println!("  sketchbook --rename <ID> --title <T>   Rename a drawing");
    println!("  sketchbook --delete <ID>               Delete a drawing");
    println!("  sketchbook --export-thumbnail <ID> --output <PATH>");
    println!("  sketchbook --show-settings             Print tool preferences");
    println!("  sketchbook --reset-settings            Restore default preferences");
    println!("  sketchbook --init-config               Write a default config file");
    println!("  sketchbook --help                      Show help");
    println!();
    println!("Files:");
    println!("  ~/.config/sketchbook/config.toml       Configuration");
    println!("  ~/.config/sketchbook/preferences.toml  Tool preferences");
}
