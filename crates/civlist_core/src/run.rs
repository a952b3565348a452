use anyhow::Result;
use serde::Serialize;

use crate::client::WikiWriteApi;
use crate::config::RunConfig;
use crate::handlers::{InactiveCategoryHandler, LiveCategoryHandler, RunOutcome};
use crate::process::{ServerActivity, process_server_category};
use crate::report::{publish_report, render_report};

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Suppress the report publish. Page reclassification edits are gated
    /// separately by `RunConfig::should_edit_pages`.
    pub dry_run: bool,
}

#[derive(Debug, Serialize)]
pub struct RunReport {
    pub live_servers: Vec<ServerActivity>,
    pub inactive_servers: Vec<ServerActivity>,
    pub moved_to_live: Vec<String>,
    pub moved_to_inactive: Vec<String>,
    pub report_title: String,
    pub published: bool,
    pub request_count: usize,
}

/// One full maintenance pass: reclassify both categories, then rebuild the
/// summary page. The inactive category is processed first, then the live
/// one, matching the order the listing has always been produced in.
pub fn run_pass<A: WikiWriteApi>(
    api: &mut A,
    run: &RunConfig,
    options: &RunOptions,
) -> Result<RunReport> {
    let mut outcome = RunOutcome::default();

    let inactive_servers = process_server_category(
        &mut *api,
        run,
        &run.inactive_category,
        &InactiveCategoryHandler,
        &mut outcome,
    )?;
    let live_servers = process_server_category(
        &mut *api,
        run,
        &run.live_category,
        &LiveCategoryHandler,
        &mut outcome,
    )?;

    let wikitext = render_report(run, &live_servers, &inactive_servers, &outcome);
    println!("{wikitext}");

    let published = !options.dry_run;
    if published {
        publish_report(&mut *api, run, &wikitext)?;
    }

    Ok(RunReport {
        live_servers,
        inactive_servers,
        moved_to_live: outcome.moved_to_live,
        moved_to_inactive: outcome.moved_to_inactive,
        report_title: run.report_title.clone(),
        published,
        request_count: api.request_count(),
    })
}
