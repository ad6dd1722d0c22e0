use clap::Args;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::display_name;
use crate::installer::{
    CommandRunner, PackageJsonUpdate, PackageManager, ShellCommand, SystemRunner,
    update_package_json,
};
use crate::layout::ProjectLayout;
use crate::prompt::{Prompter, TerminalPrompter};
use crate::templates::{CONVEX_STARTER, TemplateSource, Variables};
use crate::{Error, Result, fs_ops, templates};

const DEFAULT_PROJECT_NAME: &str = "bna-convex-app";
const MAX_NAME_LENGTH: usize = 214;

/// Entries tolerated when scaffolding into the current directory.
const SAFE_FILES: [&str; 5] = [".git", ".gitignore", "README.md", "LICENSE", ".DS_Store"];

#[derive(Args, Debug, Default)]
pub struct ConvexArgs {
    /// Project name, or `.` for the current directory
    pub project_name: Option<String>,

    /// Use npm
    #[arg(long, group = "package_manager")]
    pub npm: bool,

    /// Use yarn
    #[arg(long, group = "package_manager")]
    pub yarn: bool,

    /// Use pnpm
    #[arg(long, group = "package_manager")]
    pub pnpm: bool,

    /// Use bun
    #[arg(long, group = "package_manager")]
    pub bun: bool,

    /// Skip installing dependencies
    #[arg(long)]
    pub skip_install: bool,

    /// Skip the Convex backend setup
    #[arg(long)]
    pub skip_convex: bool,

    /// Template directory to copy instead of the bundled one
    #[arg(long)]
    pub template: Option<PathBuf>,
}

impl ConvexArgs {
    fn package_manager(&self) -> Option<PackageManager> {
        [
            (self.npm, PackageManager::Npm),
            (self.yarn, PackageManager::Yarn),
            (self.pnpm, PackageManager::Pnpm),
            (self.bun, PackageManager::Bun),
        ]
        .into_iter()
        .find_map(|(set, manager)| set.then_some(manager))
    }
}

/// The resolved destination of a Convex project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvexTarget {
    pub name: String,
    pub root: PathBuf,
    pub in_current_dir: bool,
}

/// Create an Expo project wired to a Convex backend.
pub fn run(cwd: &Path, args: ConvexArgs) -> Result<()> {
    println!("Welcome to BNA - Expo React Native starter with Convex");
    println!();

    let prompter = TerminalPrompter;
    let runner = SystemRunner;

    let target = resolve_target(cwd, args.project_name.clone(), &prompter)?;
    check_target(&target, &prompter)?;

    let package_manager = match args.package_manager() {
        Some(manager) => manager,
        None => {
            let user_agent = std::env::var("npm_config_user_agent").ok();
            let manager = PackageManager::from_user_agent(user_agent.as_deref());
            println!("Detected package manager: {}", manager);
            manager
        }
    };

    let template = match &args.template {
        Some(dir) => TemplateSource::Directory(dir.clone()),
        None => TemplateSource::Embedded(&CONVEX_STARTER),
    };

    println!("Creating your BNA Convex project...");
    scaffold(&template, &target)?;
    println!("Project created successfully!");

    if !args.skip_install {
        println!("Installing dependencies with {}...", package_manager);
        runner.run(&package_manager.install_all_command(&target.root))?;
    }

    if !args.skip_convex {
        initialize_convex(&target.root, &target.name, &runner);
    }

    print!(
        "{}",
        success_message(&target, package_manager, args.skip_install, args.skip_convex)
    );
    Ok(())
}

/// Check an npm-style package name.
pub fn validate_project_name(name: &str) -> Result<()> {
    let invalid = |reason: &str| -> Result<()> {
        Err(Error::InvalidProjectName {
            name: name.to_string(),
            reason: reason.to_string(),
        })
    };

    if name.trim().is_empty() {
        return invalid("project name cannot be empty");
    }
    if name.len() > MAX_NAME_LENGTH {
        return invalid("project name must be at most 214 characters");
    }
    if name.starts_with('.') || name.starts_with('_') {
        return invalid("project name cannot start with a dot or underscore");
    }
    if !name.chars().all(is_name_char) {
        return invalid(
            "project name may only contain lowercase letters, digits, hyphens, underscores and dots",
        );
    }
    Ok(())
}

/// Lowercase `name`, replace characters a package name cannot hold with
/// `-`, and drop leading `.`, `_` and `-`.
pub fn sanitize_project_name(name: &str) -> String {
    let replaced: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if is_name_char(c) { c } else { '-' })
        .collect();
    replaced
        .trim_start_matches(['.', '_', '-'])
        .to_string()
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '_' | '.')
}

/// Work out the project name and directory, prompting until the name is
/// valid.
pub fn resolve_target(
    cwd: &Path,
    project_name: Option<String>,
    prompter: &dyn Prompter,
) -> Result<ConvexTarget> {
    let name = match project_name {
        Some(name) => name,
        None => prompt_name(prompter, "What is your project name?", true)?,
    };

    if name == "." {
        let current = display_name(cwd);
        let name = match validate_project_name(&current) {
            Ok(()) => current,
            Err(e) => {
                println!("{}", e);
                prompt_name(prompter, "Please enter a valid project name:", false)?
            }
        };
        return Ok(ConvexTarget {
            name: sanitize_project_name(&name),
            root: cwd.to_path_buf(),
            in_current_dir: true,
        });
    }

    validate_project_name(&name)?;
    let name = sanitize_project_name(&name);
    Ok(ConvexTarget {
        root: cwd.join(&name),
        name,
        in_current_dir: false,
    })
}

fn prompt_name(prompter: &dyn Prompter, message: &str, allow_current: bool) -> Result<String> {
    loop {
        let answer = prompter.input(message, DEFAULT_PROJECT_NAME)?;
        let answer = answer.trim();
        if allow_current && answer == "." {
            return Ok(answer.to_string());
        }
        match validate_project_name(answer) {
            Ok(()) => return Ok(answer.to_string()),
            Err(e) => println!("{}", e),
        }
    }
}

/// Refuse to scaffold over existing work unless the user agrees.
pub fn check_target(target: &ConvexTarget, prompter: &dyn Prompter) -> Result<()> {
    if target.in_current_dir {
        let conflicts = fs_ops::unexpected_entries(&target.root, &SAFE_FILES)?;
        if conflicts.is_empty() {
            return Ok(());
        }
        println!("Current directory is not empty. Found:");
        for path in &conflicts {
            println!("  {}", display_name(path));
        }
        if !prompter.confirm("Continue anyway?", false)? {
            return Err(Error::Aborted);
        }
        return Ok(());
    }

    if target.root.exists() && !fs_ops::list_files(&target.root)?.is_empty() {
        return Err(Error::DirectoryNotEmpty(target.root.clone()));
    }
    Ok(())
}

/// Copy the template into the target and stamp the project name into
/// `package.json` and `app.json`.
pub fn scaffold(template: &TemplateSource, target: &ConvexTarget) -> Result<()> {
    let vars: Variables = [("PROJECT_NAME".to_string(), target.name.clone())]
        .into_iter()
        .collect();
    let written = templates::copy_template(template, &target.root, &vars)?;
    info!(files = written.len(), "template copied");

    let layout = ProjectLayout::new(&target.root);
    update_package_json(
        layout.package_json(),
        &PackageJsonUpdate {
            name: Some(target.name.clone()),
            ..Default::default()
        },
    )?;
    update_app_json(layout.app_json(), &target.name)
}

fn update_app_json(path: &Path, name: &str) -> Result<()> {
    let mut app: Value = fs_ops::read_json(path)?;
    let expo = app
        .get_mut("expo")
        .and_then(Value::as_object_mut)
        .ok_or_else(|| Error::JsonShape {
            path: path.to_path_buf(),
            reason: "missing \"expo\" object".to_string(),
        })?;

    for key in ["name", "slug", "scheme"] {
        expo.insert(key.to_string(), Value::String(name.to_string()));
    }
    fs_ops::write_json(path, &app)
}

struct ConvexStep {
    title: &'static str,
    args: Vec<String>,
}

impl ConvexStep {
    fn new(title: &'static str, args: &[&str]) -> Self {
        Self {
            title,
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    fn command(&self, root: &Path) -> ShellCommand {
        ShellCommand::new("npx", root).args(self.args.iter().cloned())
    }
}

/// Run the interactive Convex setup steps. Returns the commands that failed.
///
/// The backend step gates the rest; each later step is attempted even if
/// an earlier one failed.
pub fn initialize_convex(root: &Path, name: &str, runner: &dyn CommandRunner) -> Vec<String> {
    println!();
    println!("Initializing Convex...");
    println!("The next steps are interactive. Please follow the prompts from the Convex CLI.");
    println!();

    let backend = ConvexStep::new(
        "1. Setting up your Convex backend...",
        &["convex", "dev", "--once"],
    );
    println!("{}", backend.title);
    println!("A browser window will open for you to log in or sign up.");
    let command = backend.command(root);
    if let Err(e) = runner.run(&command) {
        warn!(error = %e, "failed to initialize Convex backend");
        println!("You can try running \"npx convex dev\" in your project directory later.");
        return vec![command.to_string()];
    }
    println!("Convex backend initialized!");

    let expo_url = format!("{}://", name);
    let steps = [
        ConvexStep::new("2. Setting up Convex Auth...", &["@convex-dev/auth"]),
        ConvexStep::new(
            "3. Setting the EXPO_URL environment variable in Convex...",
            &["convex", "env", "set", "EXPO_URL", expo_url.as_str()],
        ),
        ConvexStep::new(
            "4. Setting the SITE_URL environment variable in Convex...",
            &["convex", "env", "set", "SITE_URL", "http://localhost:3000/"],
        ),
    ];

    let mut failed = Vec::new();
    for step in &steps {
        println!("{}", step.title);
        let command = step.command(root);
        match runner.run(&command) {
            Ok(()) => println!("Done."),
            Err(e) => {
                warn!(error = %e, "Convex setup step failed");
                println!("You can run it manually in your project directory:");
                println!("   {}", command);
                failed.push(command.to_string());
            }
        }
    }
    failed
}

fn success_message(
    target: &ConvexTarget,
    package_manager: PackageManager,
    skip_install: bool,
    skip_convex: bool,
) -> String {
    let start = package_manager.run_script("start");
    let mut lines = vec![
        String::new(),
        format!("Successfully created {} with Convex!", target.name),
        String::new(),
        "Next steps:".to_string(),
    ];

    if !target.in_current_dir {
        lines.push(format!("  cd {}", target.name));
    }
    if skip_install {
        lines.push(format!("  {} install", package_manager));
    }
    if skip_convex {
        lines.push("  npx convex dev".to_string());
        lines.push("  npx @convex-dev/auth".to_string());
    }
    lines.push(format!("  {}", start));
    lines.push(String::new());

    lines.push("Available commands:".to_string());
    for (script, description) in [
        ("start", "Start the development server"),
        ("android", "Run on Android"),
        ("ios", "Run on iOS"),
        ("web", "Run on Web"),
    ] {
        lines.push(format!(
            "  {:<18} {}",
            package_manager.run_script(script),
            description
        ));
    }
    lines.push(String::new());

    if !skip_convex {
        lines.push("Convex commands:".to_string());
        lines.push("  npx convex dev        Start Convex development server".to_string());
        lines.push("  npx convex dashboard  Open Convex dashboard".to_string());
        lines.push(String::new());
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
