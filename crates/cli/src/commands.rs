use anyhow::Context;
use pricecast_core::client::http::HttpBackend;
use pricecast_core::flow::form::{FormField, PredictionForm};
use pricecast_core::flow::history::HistoryFlow;
use pricecast_core::flow::model_info::{check_health, ModelInfoFlow};
use pricecast_core::flow::FetchState;
use pricecast_core::render;

#[derive(Debug, clap::Args)]
pub struct PredictArgs {
    /// Hour of day (0-23).
    #[arg(long, default_value = "12", allow_hyphen_values = true)]
    hour: String,

    /// Electricity load in MW.
    #[arg(long, default_value = "15000", allow_hyphen_values = true)]
    load: String,

    /// Temperature in degrees Celsius.
    #[arg(long, default_value = "25", allow_hyphen_values = true)]
    temperature: String,

    #[arg(long)]
    weekend: bool,

    #[arg(long)]
    holiday: bool,
}

/// Returns whether the form ended without an error.
pub async fn predict(backend: &HttpBackend, args: PredictArgs) -> anyhow::Result<bool> {
    let mut form = PredictionForm::new();
    for (name, raw) in [
        ("hour", args.hour.as_str()),
        ("load", args.load.as_str()),
        ("temperature", args.temperature.as_str()),
    ] {
        form.update_field(name, raw)
            .with_context(|| format!("failed to set form field {name}"))?;
    }
    form.set_checked(FormField::Weekend, args.weekend);
    form.set_checked(FormField::Holiday, args.holiday);

    form.submit(backend).await;

    print!("{}", render::result::form_view(form.state()));
    Ok(form.state().error.is_none())
}

pub async fn history(backend: &HttpBackend) -> bool {
    let mut flow = HistoryFlow::new();
    flow.load_recent(backend).await;

    println!("Prediction History");
    println!();
    print!("{}", render::history::history_view(flow.state()));
    !matches!(flow.state(), FetchState::Errored(_))
}

pub async fn about(backend: &HttpBackend) -> bool {
    let mut flow = ModelInfoFlow::new();
    flow.load(backend).await;

    print!("{}", render::about::about_view(flow.state()));
    // A warning does not fail the page.
    true
}

pub async fn health(backend: &HttpBackend) -> bool {
    let state = check_health(backend).await;
    println!("{}", render::about::health_line(&state));
    matches!(state, FetchState::Loaded(ref h) if h.model_loaded)
}
