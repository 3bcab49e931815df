use std::{
    cell::RefCell,
    path::{Path, PathBuf},
    rc::Rc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use futures::executor::block_on;

#[derive(Parser, Debug)]
#[command(name = "inkplate", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a design script and write the flattened PNG.
    Render(RenderArgs),
    /// Replay a design script, upload its images and export into a local store, and print the
    /// resulting cart line item.
    Save(SaveArgs),
}

#[derive(Parser, Debug)]
struct CommonArgs {
    /// Input design script JSON.
    #[arg(long)]
    script: PathBuf,

    /// Editor config JSON (defaults to the standard 500×500 template).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Register a font: `Family=path.ttf` or `Family:bold=path.ttf`. Repeatable.
    #[arg(long = "font", value_name = "SPEC")]
    fonts: Vec<String>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Render the 1× viewport instead of the export resolution.
    #[arg(long)]
    viewport: bool,
}

#[derive(Parser, Debug)]
struct SaveArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Root directory of the local object store.
    #[arg(long)]
    store: PathBuf,

    /// User id the uploads are filed under.
    #[arg(long)]
    user: String,

    /// Product the design is attached to.
    #[arg(long)]
    product: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Save(args) => cmd_save(args),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<inkplate::EditorConfig> {
    match path {
        Some(p) => Ok(inkplate::EditorConfig::load(p)?),
        None => {
            Ok(inkplate::EditorConfig::default().with_env_overrides(|k| std::env::var(k).ok()))
        }
    }
}

fn parse_font_spec(spec: &str) -> anyhow::Result<(String, inkplate::FontWeight, PathBuf)> {
    let (name, path) = spec
        .split_once('=')
        .with_context(|| format!("font spec '{spec}' must look like Family=path"))?;
    let (family, weight) = match name.rsplit_once(':') {
        Some((family, "bold")) => (family, inkplate::FontWeight::Bold),
        Some((family, "normal")) => (family, inkplate::FontWeight::Normal),
        Some((_, w)) => anyhow::bail!("unknown font weight '{w}' in '{spec}'"),
        None => (name, inkplate::FontWeight::Normal),
    };
    Ok((family.to_owned(), weight, PathBuf::from(path)))
}

fn make_editor(common: &CommonArgs) -> anyhow::Result<RefCell<inkplate::Editor>> {
    let config = load_config(common.config.as_deref())?;
    let mut fonts = inkplate::FontLibrary::new();
    for spec in &common.fonts {
        let (family, weight, path) = parse_font_spec(spec)?;
        fonts.register_file(&family, weight, &path)?;
    }
    Ok(RefCell::new(inkplate::Editor::with_fonts(config, fonts)?))
}

fn read_script(path: &Path) -> anyhow::Result<(inkplate::DesignScript, PathBuf)> {
    let script = inkplate::DesignScript::load(path)?;
    let base_dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    Ok((script, base_dir))
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let editor = make_editor(&args.common)?;
    let (script, base_dir) = read_script(&args.common.script)?;
    let report = block_on(inkplate::run_script(
        &editor,
        &script,
        &base_dir,
        inkplate::ImageSource::Local,
    ))?;

    let png = {
        let mut ed = editor.borrow_mut();
        if args.viewport {
            ed.render()?.encode_png()?
        } else {
            inkplate::flatten(&mut ed)?.png
        }
    };

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!(
        "applied {} steps ({} no-ops), {} objects",
        report.applied,
        report.skipped,
        editor.borrow().scene().len()
    );
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_save(args: SaveArgs) -> anyhow::Result<()> {
    let editor = make_editor(&args.common)?;
    let (script, base_dir) = read_script(&args.common.script)?;

    let config = editor.borrow().config().clone();
    let storage = Rc::new(inkplate::FsStorage::new(&args.store, &config.storage_bucket));
    storage.create_bucket()?;
    let auth = Rc::new(inkplate::StaticAuth::signed_in(args.user.clone()));
    let gateway = inkplate::UploadGateway::new(&config, storage.clone(), auth);
    let cart = inkplate::MemoryCart::default();

    let item = block_on(async {
        inkplate::run_script(
            &editor,
            &script,
            &base_dir,
            inkplate::ImageSource::Gateway {
                gateway: &gateway,
                fetcher: &*storage,
            },
        )
        .await?;
        inkplate::save_design(&editor, &gateway, &cart, &args.product).await
    })?;

    for notice in editor.borrow_mut().drain_notices() {
        eprintln!("{}", notice.message);
    }
    println!("{}", serde_json::to_string_pretty(&item)?);
    Ok(())
}
