use anyhow::Result;

use crate::client::WikiWriteApi;
use crate::config::RunConfig;
use crate::handlers::RunOutcome;
use crate::process::ServerActivity;

/// Render the two-section summary. Every server lands in the section that
/// matches its post-flip state: a server demoted during the live pass is
/// listed as inactive, a promoted one as live.
pub fn render_report(
    run: &RunConfig,
    live: &[ServerActivity],
    inactive: &[ServerActivity],
    outcome: &RunOutcome,
) -> String {
    let mut live_section = format!("== {} ==\n", run.live_category);
    let mut inactive_section = format!(
        "== {} ==\n\n''Live Servers are considered inactive if they have had less than '''{}''' page edits in the last {} days''\n",
        run.inactive_category, run.minimum_edits, run.days_cutoff
    );

    for server in live {
        if outcome.moved_to_inactive.contains(&server.name) {
            inactive_section.push_str(&inactive_server_line(run, server));
        } else {
            live_section.push_str(&live_server_line(run, server));
        }
    }
    for server in inactive {
        if outcome.moved_to_live.contains(&server.name) {
            live_section.push_str(&live_server_line(run, server));
        } else {
            inactive_section.push_str(&inactive_server_line(run, server));
        }
    }

    let mut wikitext = String::with_capacity(live_section.len() + inactive_section.len());
    wikitext.push_str(&live_section);
    wikitext.push_str(&inactive_section);
    wikitext
}

/// Overwrite the report page with the rendered document.
pub fn publish_report<A: WikiWriteApi>(api: &mut A, run: &RunConfig, wikitext: &str) -> Result<()> {
    api.edit_page(
        &run.report_title,
        wikitext,
        &format!(
            "Update the server activity listing for the last {} days",
            run.days_cutoff
        ),
    )
}

fn live_server_line(run: &RunConfig, server: &ServerActivity) -> String {
    format!(
        "* '''[[{}]]''' - ''With '''{}''' page edits in the last {} days and {} pages in total''\n",
        server.name, server.stats.recent_edits, run.days_cutoff, server.stats.total_pages
    )
}

fn inactive_server_line(run: &RunConfig, server: &ServerActivity) -> String {
    format!(
        "* '''[[{}]]''' - ''With {} page edits in the last {} days and {} pages in total''\n",
        server.name, server.stats.recent_edits, run.days_cutoff, server.stats.total_pages
    )
}
