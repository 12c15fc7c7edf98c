use std::io;
use std::rc::Rc;

use snafu::ResultExt;
use stp_client::HttpChatClient;
use stp_storage::{SqliteKvStore, UserIdentity};

use super::{
    BackendSnafu, HELP_TEXT, HostCommand, HostResult, OpenStorageSnafu, RuntimeInitSnafu,
    TerminalView,
};
use crate::chat::{WidgetController, WidgetView};
use crate::settings::SettingsStore;

/// Runs the stdin REPL until `/quit` or end of input.
pub fn run() -> HostResult<()> {
    let settings_store = SettingsStore::load();
    match settings_store.persist_if_missing() {
        Ok(true) => tracing::info!(
            "wrote default settings to {}",
            settings_store.config_path().display()
        ),
        Ok(false) => {}
        Err(error) => tracing::warn!("failed to write default settings: {error}"),
    }
    let settings = settings_store.settings().clone();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context(RuntimeInitSnafu {
            stage: "host-build-runtime",
        })?;

    let database_path = settings.database_path_or_default();
    let location = database_path.to_string_lossy().into_owned();
    let storage = runtime
        .block_on(SqliteKvStore::open(&location))
        .context(OpenStorageSnafu {
            stage: "host-open-storage",
            location: location.clone(),
        })?;
    let backend = HttpChatClient::new(settings.endpoint.clone()).context(BackendSnafu {
        stage: "host-build-client",
    })?;

    let identity = UserIdentity::from_declared(settings.user_id.as_deref());
    tracing::info!(
        "chat host for '{}' against {} (history in {})",
        identity,
        backend.base_url(),
        location
    );

    let view = Rc::new(TerminalView::new(
        io::stdin().lock(),
        io::stdout(),
        settings.labels.typing_indicator.clone(),
    ));
    let controller = WidgetController::new(
        &identity,
        Rc::new(storage),
        Rc::new(backend),
        view.clone() as Rc<dyn WidgetView>,
    )
    .with_labels(settings.labels.clone());

    view.print_line(&format!("== {} ==", controller.labels().title));
    view.print_line(HELP_TEXT);
    controller.initialize();

    while let Some(line) = view.read_line() {
        match HostCommand::parse(&line) {
            HostCommand::Blank => {}
            HostCommand::Send(text) => {
                if !view.is_panel_open() {
                    controller.toggle();
                }
                view.set_input(&text);
                let outcome = runtime.block_on(controller.send());
                tracing::debug!("send finished: {outcome:?}");
            }
            HostCommand::Toggle => {
                controller.toggle();
            }
            HostCommand::Reset => {
                let outcome = runtime.block_on(controller.reset());
                tracing::debug!("reset finished: {outcome:?}");
            }
            HostCommand::History => view.print_history(&controller.history()),
            HostCommand::Help => view.print_line(HELP_TEXT),
            HostCommand::Quit => break,
            HostCommand::Unknown(command) => {
                view.print_line(&format!("unknown command {command}, try /help"));
            }
        }
    }

    Ok(())
}
