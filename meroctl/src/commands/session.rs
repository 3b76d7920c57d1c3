use crate::{
    cli::OutputOptions,
    commands::samples::{format_details, format_latest, format_listing},
    config::Config,
    output::OutputFormat,
    prompt::{self, SamplePrompt, confirm_save, prompt_draft, prompt_view_params},
};
use anyhow::Result;
use inquire::{InquireError, Select};
use libmero::{sample::Draft, store::SampleStore, view::ViewParams};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Display, EnumIter)]
enum Action {
    #[strum(to_string = "List samples")]
    List,
    #[strum(to_string = "Search and filter samples")]
    Search,
    #[strum(to_string = "Register a new sample")]
    Add,
    #[strum(to_string = "Edit a sample")]
    Edit,
    #[strum(to_string = "Show sample details")]
    Show,
    #[strum(to_string = "Show latest samples")]
    Latest,
    Quit,
}

/// Run an interactive session against the store until the user quits. Nothing is persisted: the
/// store and everything that was registered in it are discarded when the session ends.
pub(crate) fn run(store: &mut SampleStore, cfg: &Config) -> Result<()> {
    let mut params = ViewParams::new().with_sort(cfg.default_sort);
    println!(
        "Starting session with {} sample(s). Press <esc> to cancel any prompt.",
        store.len()
    );
    loop {
        let action = match Select::new("What would you like to do?", Action::iter().collect())
            .prompt()
        {
            Ok(action) => action,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                Action::Quit
            }
            Err(e) => return Err(e.into()),
        };
        debug!(?action, "session action");
        let res = match action {
            Action::List => list(store, &params),
            Action::Search => prompt_view_params(&params)
                .map_err(anyhow::Error::from)
                .and_then(|p| {
                    params = p;
                    list(store, &params)
                }),
            Action::Add => add(store),
            Action::Edit => edit(store),
            Action::Show => show(store),
            Action::Latest => latest(store),
            Action::Quit => break,
        };
        if let Err(e) = res {
            match e.downcast_ref::<prompt::Error>() {
                Some(prompt::Error::Prompt(InquireError::OperationCanceled)) => {
                    println!("Cancelled")
                }
                Some(prompt::Error::Prompt(InquireError::OperationInterrupted)) => break,
                _ => return Err(e),
            }
        }
    }
    println!("Session ended, {} sample(s) discarded", store.len());
    Ok(())
}

fn list(store: &SampleStore, params: &ViewParams) -> Result<()> {
    let samples = params.apply(store.samples());
    if samples.is_empty() {
        println!("No samples found");
        return Ok(());
    }
    let output = OutputOptions {
        full: false,
        output: Some(OutputFormat::Table),
    };
    println!("{}", format_listing(&samples, &output, &Config::default())?);
    Ok(())
}

/// Save a draft that the user filled in, unless it fails validation or the user changes their
/// mind. Returns the id of the saved sample.
fn save<F>(draft: Draft, commit: F) -> Result<Option<String>>
where
    F: FnOnce(Draft) -> libmero::Result<String>,
{
    if !confirm_save(&draft)? {
        return Ok(None);
    }
    match commit(draft) {
        Ok(id) => Ok(Some(id)),
        Err(libmero::Error::Validation(e)) => {
            println!("Sample was not saved: {e}");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

fn add(store: &mut SampleStore) -> Result<()> {
    let draft = prompt_draft(Draft::new())?;
    if let Some(id) = save(draft, |d| store.register(d).map(|s| s.id().to_string()))? {
        println!("Registered sample {id}");
    }
    Ok(())
}

fn edit(store: &mut SampleStore) -> Result<()> {
    let choice = SamplePrompt::new("Sample to edit:", store).prompt()?;
    // edits address the sample by its position in the store, not in the current listing
    let Some((index, id)) = choice
        .index(store)
        .and_then(|index| store.get(index).map(|s| (index, s.id().to_string())))
    else {
        println!("Sample {choice} not found");
        return Ok(());
    };
    println!("Editing sample {id}. Press <enter> to keep the current value of a field.");
    let draft = prompt_draft(store.draft_for(index)?)?;
    if let Some(newid) = save(draft, |d| {
        store.update(index, d).map(|s| s.id().to_string())
    })? {
        match newid == id {
            true => println!("Updated sample {newid}"),
            false => println!("Updated sample {id}, which is now {newid}"),
        }
    }
    Ok(())
}

fn show(store: &SampleStore) -> Result<()> {
    let choice = SamplePrompt::new("Sample:", store).prompt()?;
    match choice.index(store).and_then(|index| store.get(index)) {
        Some(sample) => println!("{}", format_details(sample, OutputFormat::Table)?),
        None => println!("Sample {choice} not found"),
    }
    Ok(())
}

fn latest(store: &SampleStore) -> Result<()> {
    match format_latest(store, OutputFormat::Table)? {
        Some(str) => println!("{str}"),
        None => println!("No samples have been registered"),
    }
    Ok(())
}
