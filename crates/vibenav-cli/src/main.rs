use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use vibenav_contracts::blueprint::export::plain_text;
use vibenav_contracts::blueprint::{
    Attachment, GenerationRequest, IndustryProfile, DEFAULT_PRIMARY_COLOR, STYLE_PRESETS,
};
use vibenav_contracts::sections::SectionSelection;
use vibenav_engine::credentials::default_sources;
use vibenav_engine::{BlueprintService, ConnectionState, CredentialVault, EngineConfig};

const DEFAULT_LOG_FILTER: &str = "warn,vibenav=info";

#[derive(Debug, Parser)]
#[command(name = "vibenav", version, about = "Brand website blueprint generator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Manage the stored API key.
    Key(KeyArgs),
    /// Check that the configured credential can reach the provider.
    Probe(ProbeArgs),
    /// List the stock section catalog and style presets.
    Sections,
    /// Generate a blueprint.
    Generate(GenerateArgs),
}

#[derive(Debug, Parser)]
struct KeyArgs {
    #[command(subcommand)]
    action: KeyAction,
}

#[derive(Debug, Subcommand)]
enum KeyAction {
    /// Probe a key and store it when it works. Reads stdin when --secret is absent.
    Set {
        #[arg(long)]
        secret: Option<String>,
    },
    /// Show whether a key is stored (fingerprint only).
    Show,
    /// Remove the stored key.
    Clear,
}

#[derive(Debug, Parser)]
struct ProbeArgs {
    /// Credential source: host, user or env.
    #[arg(long)]
    source: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Debug, Parser)]
struct GenerateArgs {
    #[arg(long)]
    brand: Option<String>,
    #[arg(long)]
    text: Option<String>,
    #[arg(long)]
    text_file: Option<PathBuf>,
    /// Reference file forwarded to the model (image, PDF, text).
    #[arg(long)]
    file: Option<PathBuf>,
    /// Plan only these sections (repeatable). Defaults to the full catalog.
    #[arg(long = "section")]
    sections: Vec<String>,
    #[arg(long = "disable-section")]
    disabled_sections: Vec<String>,
    /// Custom section as `id=display name` (repeatable).
    #[arg(long = "add-section")]
    custom_sections: Vec<String>,
    #[arg(long, default_value = DEFAULT_PRIMARY_COLOR)]
    color: String,
    #[arg(long, default_value = STYLE_PRESETS[0])]
    style: String,
    #[arg(long, default_value = "general")]
    industry: IndustryProfile,
    #[arg(long)]
    seo_keywords: Option<String>,
    #[arg(long)]
    instructions: Option<String>,
    #[arg(long)]
    model: Option<String>,
    #[arg(long)]
    language: Option<String>,
    #[arg(long)]
    source: Option<String>,
    #[arg(long, value_enum, default_value = "json")]
    format: OutputFormat,
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() {
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("vibenav error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn run() -> Result<i32> {
    let _ = dotenvy::dotenv();
    init_logging();
    let cli = Cli::parse();
    let config = EngineConfig::from_env();
    match cli.command {
        Command::Key(args) => run_key(args, &config),
        Command::Probe(args) => run_probe(args, &config),
        Command::Sections => run_sections(),
        Command::Generate(args) => run_generate(args, config),
    }
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .compact()
        .try_init();
}

fn run_key(args: KeyArgs, config: &EngineConfig) -> Result<i32> {
    match args.action {
        KeyAction::Set { secret } => {
            let secret = match secret {
                Some(secret) => secret,
                None => read_secret_from_stdin()?,
            };
            let mut service = BlueprintService::from_config(config);
            let state = service
                .connect(&secret)
                .context("failed to store the API key")?;
            println!("{}", state.as_str());
            Ok(exit_code_for(state))
        }
        KeyAction::Show => {
            let vault = CredentialVault::new(config.vault_path.clone());
            match vault.load().and_then(vibenav_engine::Credential::new) {
                Some(credential) => println!(
                    "stored key {} in {}",
                    credential.fingerprint(),
                    vault.path().display()
                ),
                None => println!("no stored key in {}", vault.path().display()),
            }
            Ok(0)
        }
        KeyAction::Clear => {
            let mut service = BlueprintService::from_config(config);
            service
                .disconnect()
                .context("failed to clear the stored API key")?;
            println!("cleared");
            Ok(0)
        }
    }
}

fn run_probe(args: ProbeArgs, config: &EngineConfig) -> Result<i32> {
    let mut service = BlueprintService::from_config(config);
    let state = start_service(&mut service, config, args.source.as_deref())?;
    println!("{}", state.as_str());
    Ok(exit_code_for(state))
}

fn run_sections() -> Result<i32> {
    let catalog = SectionSelection::default_catalog();
    let mut stdout = io::stdout().lock();
    for entry in catalog.entries() {
        writeln!(stdout, "{:<18} {}", entry.id, entry.display_name)?;
    }
    writeln!(stdout)?;
    writeln!(stdout, "styles: {}", STYLE_PRESETS.join(", "))?;
    Ok(0)
}

fn run_generate(args: GenerateArgs, mut config: EngineConfig) -> Result<i32> {
    if let Some(model) = args.model.clone() {
        config = config.with_generation_model(model);
    }
    if let Some(language) = args.language.clone() {
        config.output_language = language;
    }
    let request = build_request(&args)?;
    if !request.has_content() {
        bail!("provide --brand, --text, --text-file or --file");
    }

    let mut service = BlueprintService::from_config(&config);
    let state = start_service(&mut service, &config, args.source.as_deref())?;
    if state != ConnectionState::Verified {
        bail!(
            "no working API key ({}); run `vibenav key set` first",
            state.as_str()
        );
    }

    let blueprint = match service.generate_blueprint(&request) {
        Ok(blueprint) => blueprint,
        Err(err) => {
            eprintln!("{}", err.user_message());
            return Err(anyhow::Error::new(err).context("blueprint generation failed"));
        }
    };

    let rendered = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&blueprint)?,
        OutputFormat::Text => plain_text(&blueprint),
    };
    match args.out.as_deref() {
        Some(path) => {
            write_output(path, &rendered)?;
            println!("Blueprint written to {}", path.display());
        }
        None => println!("{rendered}"),
    }
    Ok(0)
}

fn start_service(
    service: &mut BlueprintService,
    config: &EngineConfig,
    source_override: Option<&str>,
) -> Result<ConnectionState> {
    let name = source_override
        .map(|value| value.trim().to_ascii_lowercase())
        .unwrap_or_else(|| config.credential_source.clone());
    let sources = default_sources(config);
    let Some(source) = sources.get(&name) else {
        bail!(
            "unknown credential source '{name}' (available: {})",
            sources.list().join(", ")
        );
    };
    tracing::info!(
        source = %name,
        model = service.generation_model(),
        "resolving credential"
    );
    Ok(service.startup(source.as_ref()))
}

fn build_request(args: &GenerateArgs) -> Result<GenerationRequest> {
    let mut free_text = args.text.clone().unwrap_or_default();
    if let Some(path) = args.text_file.as_deref() {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed reading text file {}", path.display()))?;
        if !free_text.trim().is_empty() {
            free_text.push_str("\n\n");
        }
        free_text.push_str(&contents);
    }
    let attachment = args
        .file
        .as_deref()
        .map(|path| {
            Attachment::from_path(path)
                .with_context(|| format!("failed reading {}", path.display()))
        })
        .transpose()?;

    Ok(GenerationRequest {
        brand_name: args.brand.clone(),
        free_text,
        sections: build_sections(args)?,
        primary_color: args.color.clone(),
        style: args.style.clone(),
        industry_profile: args.industry,
        seo_keywords: args.seo_keywords.clone(),
        attachment,
        extra_instructions: args.instructions.clone(),
    })
}

fn build_sections(args: &GenerateArgs) -> Result<SectionSelection> {
    let mut sections = SectionSelection::default_catalog();
    for raw in &args.custom_sections {
        let (id, name) = parse_section_pair(raw)?;
        sections
            .append_custom(id, name)
            .with_context(|| format!("invalid --add-section '{raw}'"))?;
    }
    if !args.sections.is_empty() {
        sections.disable_all();
        for id in &args.sections {
            sections
                .set_enabled(id, true)
                .with_context(|| format!("invalid --section '{id}'"))?;
        }
    }
    for id in &args.disabled_sections {
        sections
            .set_enabled(id, false)
            .with_context(|| format!("invalid --disable-section '{id}'"))?;
    }
    if sections.enabled_count() == 0 {
        bail!("at least one section must stay enabled");
    }
    Ok(sections)
}

fn parse_section_pair(raw: &str) -> Result<(&str, &str)> {
    let (id, name) = raw.split_once('=').unwrap_or((raw, ""));
    let id = id.trim();
    if id.is_empty() {
        return Err(anyhow!("custom section needs an id, got '{raw}'"));
    }
    Ok((id, name.trim()))
}

fn read_secret_from_stdin() -> Result<String> {
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed reading the API key from stdin")?;
    Ok(line.trim().to_string())
}

fn write_output(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}

fn exit_code_for(state: ConnectionState) -> i32 {
    match state {
        ConnectionState::Verified => 0,
        ConnectionState::Disconnected | ConnectionState::Rejected => 2,
    }
}
