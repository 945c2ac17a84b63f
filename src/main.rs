use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tasky::domain::{render_tasks, IdGenerator, Task, POPULAR_EMOJIS};
use tasky::persistence::{
    get_data_dir, init_local_data_dir, load_settings, save_settings, FileStore, Gateway, Settings,
    SETTINGS_FILE,
};
use tasky::{logging, AppState, Edit, Session, Transition, View};

#[derive(Parser)]
#[command(name = "tasky")]
#[command(about = "A small to-do list manager with nested subtasks and an archive", long_about = None)]
struct Cli {
    /// Data directory. Defaults to a local .tasky directory, then ~/.tasky
    #[arg(long, global = true)]
    dir: Option<PathBuf>,
    /// Log every mutation to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a local .tasky directory in the current directory
    Init,
    /// Show the selected list, or the archive when it is being viewed
    Show,
    /// Show all lists
    Lists,
    /// Manage lists
    List {
        #[command(subcommand)]
        action: ListAction,
    },
    /// Switch to the archive view and show it
    Archive,
    /// Add a task to the selected list (or --list)
    Add {
        text: Vec<String>,
        #[arg(short, long)]
        list: Option<String>,
    },
    /// Add a subtask to a task
    Sub { parent: String, text: Vec<String> },
    /// Mark a task done (top-level tasks move to the archive)
    Done { id: String },
    /// Mark a task not done (archived tasks return to their list)
    Undone { id: String },
    /// Replace a task's text; blank text deletes the task
    Edit { id: String, text: Vec<String> },
    /// Delete a task or subtask
    Rm { id: String },
    /// Delete a direct subtask of a task
    RmSub { parent: String, id: String },
    /// Remove done tasks from the selected list (or --list)
    Clear {
        #[arg(short, long)]
        list: Option<String>,
    },
    /// Print the emoji palette for lists
    Emojis,
}

#[derive(Subcommand)]
enum ListAction {
    /// Create a list and select it
    Add { name: Vec<String> },
    /// Rename a list
    Rename { id: String, name: Vec<String> },
    /// Delete a list, its tasks and their archived copies
    Delete { id: String },
    /// Set a list's emoji
    Emoji { id: String, emoji: String },
    /// Select a list
    Select { id: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Some(Commands::Init) => {
            let data_dir = init_local_data_dir()?;
            save_settings(data_dir.join(SETTINGS_FILE), &Settings::default())?;
            println!("Initialized tasky directory: {}", data_dir.display());
            Ok(())
        }
        Some(Commands::Emojis) => {
            println!("{}", POPULAR_EMOJIS.join(" "));
            Ok(())
        }
        command => {
            let mut session = open_session(cli.dir)?;
            run_command(&mut session, command.unwrap_or(Commands::Show))
        }
    }
}

fn open_session(dir: Option<PathBuf>) -> Result<Session<FileStore>> {
    let data_dir = match dir {
        Some(dir) => dir,
        None => get_data_dir()?,
    };
    tracing::debug!(dir = %data_dir.display(), "using data directory");

    let store = FileStore::open(&data_dir)?;
    let settings = load_settings(data_dir.join(SETTINGS_FILE))?;
    Session::open(Gateway::new(store), &settings, IdGenerator::default())
}

fn run_command(session: &mut Session<FileStore>, command: Commands) -> Result<()> {
    match command {
        Commands::Show => {}
        Commands::Lists => {
            print_lists(session.state());
            return Ok(());
        }
        Commands::List { action } => return run_list_action(session, action),
        Commands::Archive => session.mutate(|s| {
            s.view_archive();
            Ok(())
        })?,
        Commands::Add { text, list } => {
            let text = text.join(" ");
            let id = session.mutate(|s| {
                let task = match &list {
                    Some(list_id) => s.add_task(list_id, &text)?,
                    None => s.add_task_to_current(&text)?,
                };
                Ok(task.id.clone())
            })?;
            println!("Added {}", id);
        }
        Commands::Sub { parent, text } => {
            let text = text.join(" ");
            let id = session.mutate(|s| Ok(s.add_subtask(&parent, &text)?.id.clone()))?;
            println!("Added {} under {}", id, parent);
        }
        Commands::Done { id } => {
            let transition = session.mutate(|s| s.set_done(&id, true))?;
            print_transition(&id, transition, true);
        }
        Commands::Undone { id } => {
            let transition = session.mutate(|s| s.set_done(&id, false))?;
            print_transition(&id, transition, false);
        }
        Commands::Edit { id, text } => {
            let text = text.join(" ");
            match session.mutate(|s| s.edit_task_text(&id, &text))? {
                Edit::Updated => println!("Updated {}", id),
                Edit::Deleted => println!("Deleted {} (blank text)", id),
            }
        }
        Commands::Rm { id } => {
            let nested = session.state().task(&id).map(Task::descendant_count);
            if session.mutate(|s| Ok(s.delete_task(&id)))? {
                match nested.unwrap_or(0) {
                    0 => println!("Deleted {}", id),
                    n => println!("Deleted {} and {} subtask(s)", id, n),
                }
            } else {
                println!("Nothing to delete: {}", id);
            }
        }
        Commands::RmSub { parent, id } => {
            if session.mutate(|s| Ok(s.delete_subtask(&parent, &id)))? {
                println!("Deleted {} from {}", id, parent);
            } else {
                println!("{} has no subtask {}", parent, id);
            }
        }
        Commands::Clear { list } => {
            let removed = session.mutate(|s| match &list {
                Some(list_id) => s.clear_completed(list_id),
                None => Ok(s.clear_completed_current()),
            })?;
            println!("Removed {} completed task(s)", removed);
        }
        Commands::Init | Commands::Emojis => unreachable!("handled before opening the store"),
    }

    print_view(session.state());
    Ok(())
}

fn run_list_action(session: &mut Session<FileStore>, action: ListAction) -> Result<()> {
    match action {
        ListAction::Add { name } => {
            let name = name.join(" ");
            let list = session.mutate(|s| Ok(s.create_list(&name).clone()))?;
            println!("Created list {} ({})", list.title(), list.id);
        }
        ListAction::Rename { id, name } => {
            let name = name.join(" ");
            if session.mutate(|s| s.rename_list(&id, &name))? {
                println!("Renamed {}", id);
            } else {
                println!("Name is blank, kept the old one");
            }
        }
        ListAction::Delete { id } => {
            let task_count = session.state().list(&id).map(|l| l.tasks.len());
            if session.mutate(|s| Ok(s.delete_list(&id)))? {
                println!("Deleted list {} and its {} task(s)", id, task_count.unwrap_or(0));
            } else {
                println!("Nothing to delete: {}", id);
            }
        }
        ListAction::Emoji { id, emoji } => {
            session.mutate(|s| s.set_emoji(&id, &emoji))?;
        }
        ListAction::Select { id } => {
            session.mutate(|s| s.select_list(&id))?;
        }
    }

    print_lists(session.state());
    Ok(())
}

fn print_transition(id: &str, transition: Transition, done: bool) {
    match transition {
        Transition::Archived => println!("Archived {}", id),
        Transition::Restored => println!("Restored {} to its list", id),
        Transition::Dropped => println!("Dropped {}: its list no longer exists", id),
        Transition::Flagged if done => println!("Marked {} done", id),
        Transition::Flagged => println!("Marked {} not done", id),
    }
}

fn print_lists(state: &AppState) {
    for list in &state.lists {
        let marker = if !state.viewing_archived && state.current_list_id.as_deref() == Some(list.id.as_str()) {
            "*"
        } else {
            " "
        };
        println!(
            "{} {}  ({})  {}/{} open",
            marker,
            list.title(),
            list.id,
            list.open_count(),
            list.tasks.len()
        );
    }
    let marker = if state.viewing_archived { "*" } else { " " };
    println!("{} 🗂 Archived tasks  {}", marker, state.archived.len());
}

fn print_view(state: &AppState) {
    match state.view() {
        View::Archive(tasks) => {
            println!("\n🗂 Archived tasks");
            print_tasks(tasks);
        }
        View::List(list) => {
            println!("\n{}", list.title());
            print_tasks(&list.tasks);
        }
        View::Empty => println!("\nSelect or create a list first."),
    }
}

fn print_tasks(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("(no tasks)");
    } else {
        print!("{}", render_tasks(tasks));
    }
}
