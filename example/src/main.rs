//! Drives the sales report screen headlessly: edits the range through the
//! picker, lets the report poll, then unmounts.

mod backend;
mod sales_report;

use std::{env, sync::Arc, time::Duration};

use chrono::{Local, NaiveDate};
use storeline_components::{
    DateRangeState, RangeField, ThemeMode, ThemeStore, date_time_picker::PickerContent,
};
use storeline_ui::{Dp, logging::init_tracing};
use tracing::{error, info};

use crate::{backend::StubBackend, sales_report::SalesReportScreen};

const THEME_FILE_ENV: &str = "STORELINE_THEME_FILE";

fn theme_store() -> ThemeStore {
    let Ok(path) = env::var(THEME_FILE_ENV) else {
        return ThemeStore::load_or_default();
    };
    match ThemeStore::load(&path) {
        Ok(store) => store,
        Err(err) => {
            error!(error = %err, "could not load theme, using light mode");
            ThemeStore::in_memory(ThemeMode::Light)
        }
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[tokio::main]
async fn main() {
    init_tracing();

    let theme = theme_store();
    let backend = Arc::new(StubBackend::new(Duration::from_millis(250)));
    let mut screen =
        SalesReportScreen::mount(DateRangeState::whole_day(today()), theme.clone(), backend.clone());

    screen.open(RangeField::StartTime);
    if let Some(view) = screen.render() {
        if let PickerContent::Time(wheels) = &view.content {
            let row = wheels.hour.row_height;
            wheels.hour.on_scroll.call(row * 8.0);
            wheels.hour.on_settle.call();
            wheels.period.on_scroll.call(row);
            wheels.period.on_settle.call();
        }
        view.on_confirm.call();
    }
    info!(start = %screen.range().start_time(), "start time edited");

    screen.open(RangeField::EndTime);
    if let Some(view) = screen.render() {
        if let PickerContent::Time(wheels) = &view.content {
            wheels.hour.on_scroll.call(Dp(44.0) * 2.0);
            wheels.hour.on_settle.call();
        }
        view.on_confirm.call();
    }
    match screen.range().resolve() {
        Ok(range) => info!(
            start = %range.start,
            end = %range.end,
            overnight = range.overnight,
            hours = range.duration().num_hours(),
            "range"
        ),
        Err(err) => error!(error = %err, "range invalid"),
    }

    if let Err(err) = theme.toggle() {
        error!(error = %err, "could not switch theme");
    }

    tokio::time::sleep(Duration::from_secs(16)).await;
    if let Some(summary) = screen.summary() {
        info!(
            orders = summary.orders,
            revenue_cents = summary.revenue_cents,
            hours = summary.hours,
            requests = backend.request_count(),
            shift_seconds = screen.shift_seconds(),
            "report refreshed"
        );
    }

    screen.unmount();
}
