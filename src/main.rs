use anyhow::Result;
use clap::{ArgGroup, Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use twig::areas::repository::Repository;
use twig::commands::plumbing::cat_file::CatFileMode;

/// Environment variable holding the log filter
const LOG_ENV: &str = "TWIG_LOG";

#[derive(Parser)]
#[command(
    name = "twig",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "A minimal content-addressed version-control store",
    long_about = "twig stores snapshots as git-compatible blob, tree and commit objects \
    and tracks the current position with HEAD and branch refs. \
    It only moves pointers: checkout never rewrites the working directory.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[arg(short, long, global = true, help = "Log debug output to stderr")]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Initialize a new repository",
        long_about = "This command initializes a new repository in the current directory or at the specified path."
    )]
    Init {
        #[arg(index = 1, help = "The path to the repository")]
        path: Option<PathBuf>,
    },
    #[command(
        name = "hash-object",
        about = "Hash a file as a blob and optionally write it to the object database"
    )]
    HashObject {
        #[arg(short, long, help = "Write the object to the object database")]
        write: bool,
        #[arg(index = 1)]
        file: PathBuf,
    },
    #[command(
        name = "cat-file",
        about = "Print the type, size or content of an object",
        group(ArgGroup::new("mode").required(true).args(["pretty", "kind", "size"]))
    )]
    CatFile {
        #[arg(short = 'p', help = "Pretty-print the object content")]
        pretty: bool,
        #[arg(short = 't', help = "Print the object type")]
        kind: bool,
        #[arg(short = 's', help = "Print the object size")]
        size: bool,
        #[arg(index = 1, help = "Object id, abbreviated id or revision")]
        object: String,
    },
    #[command(name = "update-index", about = "Stage files in the index")]
    UpdateIndex {
        #[arg(long, help = "Allow paths not yet in the index")]
        add: bool,
        #[arg(index = 1, required = true, num_args = 1..)]
        paths: Vec<PathBuf>,
    },
    #[command(name = "ls-files", about = "List staged files")]
    LsFiles {
        #[arg(short, long, help = "Show mode and object id")]
        stage: bool,
    },
    #[command(name = "write-tree", about = "Create tree objects from the index")]
    WriteTree,
    #[command(name = "ls-tree", about = "List the contents of a tree object")]
    LsTree {
        #[arg(short, help = "Recurse into subtrees")]
        recursive: bool,
        #[arg(index = 1, help = "Tree or commit")]
        object: String,
    },
    #[command(
        name = "commit-tree",
        about = "Create a commit object from a tree",
        long_about = "This command creates a commit object and prints its id. No ref is moved."
    )]
    CommitTree {
        #[arg(index = 1)]
        tree: String,
        #[arg(short, long, help = "The commit message")]
        message: String,
        #[arg(short, long, help = "The parent commit")]
        parent: Option<String>,
    },
    #[command(
        name = "update-ref",
        about = "Point the current branch (or detached HEAD) at a commit"
    )]
    UpdateRef {
        #[arg(index = 1)]
        revision: String,
    },
    #[command(
        name = "symbolic-ref",
        about = "Print the branch HEAD points at, or attach HEAD to a branch"
    )]
    SymbolicRef {
        #[arg(index = 1)]
        target: Option<String>,
    },
    #[command(
        name = "commit",
        about = "Create a new commit with the specified message",
        long_about = "This command records the index as a new commit and advances the current branch, or HEAD when detached."
    )]
    Commit {
        #[arg(short, long, help = "The commit message")]
        message: String,
    },
    #[command(name = "branch", about = "List or create branches")]
    Branch {
        #[arg(index = 1)]
        name: Option<String>,
        #[arg(index = 2, requires = "name", help = "Revision to start from (HEAD by default)")]
        start: Option<String>,
    },
    #[command(
        name = "checkout",
        about = "Attach HEAD to a branch or detach it at a commit",
        long_about = "This command moves HEAD only. The index and the working directory are not touched."
    )]
    Checkout {
        #[arg(index = 1)]
        target: String,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let pwd = std::env::current_dir()?;

    let repository = match &cli.command {
        Commands::Init { path: Some(path) } => {
            Repository::new(path, Box::new(std::io::stdout()))?
        }
        _ => Repository::new(&pwd, Box::new(std::io::stdout()))?,
    };

    match &cli.command {
        Commands::Init { .. } => repository.init()?,
        Commands::HashObject { write, file } => repository.hash_object(file, *write)?,
        Commands::CatFile {
            pretty,
            kind,
            size: _,
            object,
        } => {
            let mode = if *pretty {
                CatFileMode::Pretty
            } else if *kind {
                CatFileMode::Type
            } else {
                CatFileMode::Size
            };

            repository.cat_file(object, mode)?
        }
        Commands::UpdateIndex { add, paths } => repository.update_index(paths, *add)?,
        Commands::LsFiles { stage } => repository.ls_files(*stage)?,
        Commands::WriteTree => repository.write_tree()?,
        Commands::LsTree { recursive, object } => repository.ls_tree(object, *recursive)?,
        Commands::CommitTree {
            tree,
            message,
            parent,
        } => repository.commit_tree(tree, message, parent.as_deref())?,
        Commands::UpdateRef { revision } => repository.update_ref(revision)?,
        Commands::SymbolicRef { target } => repository.symbolic_ref(target.as_deref())?,
        Commands::Commit { message } => repository.commit(message)?,
        Commands::Branch { name: None, .. } => repository.list_branches()?,
        Commands::Branch {
            name: Some(name),
            start,
        } => repository.branch(name, start.as_deref())?,
        Commands::Checkout { target } => repository.checkout(target)?,
    }

    repository.writer().flush()?;

    Ok(())
}
