use anyhow::Result;
use serde::Serialize;

use crate::activity::{CategoryEditStats, category_recent_edits};
use crate::client::WikiWriteApi;
use crate::config::RunConfig;
use crate::handlers::{CategoryHandler, RunOutcome};
use crate::timestamp::cutoff_timestamp;

/// One server page together with the edit activity of its category.
#[derive(Debug, Clone, Serialize)]
pub struct ServerActivity {
    pub name: String,
    pub stats: CategoryEditStats,
}

/// Walk one source category: gather per-server stats, dispatch the handler
/// for each non-excluded member, and return the servers sorted by recent
/// edits descending (ties broken by total pages descending).
///
/// A missing source category is not an error; it yields an empty result.
pub fn process_server_category<A: WikiWriteApi>(
    api: &mut A,
    run: &RunConfig,
    category: &str,
    handler: &dyn CategoryHandler,
    outcome: &mut RunOutcome,
) -> Result<Vec<ServerActivity>> {
    println!("Processing {category}");
    if !api.category_exists(category)? {
        println!("'Category:{category}' does not exist!");
        return Ok(Vec::new());
    }

    let cutoff = cutoff_timestamp(run.days_cutoff)?;
    let mut servers = Vec::new();
    for member in api.get_category_members(category)? {
        if run.is_excluded(&member) {
            continue;
        }
        let stats = category_recent_edits(&mut *api, &cutoff, &member)?;
        println!(
            "Found {} page edits for {member} with {} total pages",
            stats.recent_edits, stats.total_pages
        );
        if run.should_edit_pages {
            handler.handle(&mut *api, run, &member, stats.recent_edits, outcome)?;
        }
        servers.push(ServerActivity {
            name: member,
            stats,
        });
    }

    servers.sort_by(|left, right| {
        right
            .stats
            .recent_edits
            .cmp(&left.stats.recent_edits)
            .then(right.stats.total_pages.cmp(&left.stats.total_pages))
    });
    Ok(servers)
}

#[cfg(test)]
mod tests {
    use super::process_server_category;
    use crate::client::mock::MockApi;
    use crate::config::RunConfig;
    use crate::handlers::{CategoryHandler, LiveCategoryHandler, RunOutcome};

    fn run_config() -> RunConfig {
        RunConfig {
            days_cutoff: 30,
            minimum_edits: 1,
            live_category: "Live Servers".to_string(),
            inactive_category: "Live Servers (Inactive)".to_string(),
            exclusions: Vec::new(),
            should_edit_pages: true,
            report_title: "List of Civ Servers ordered by page edits".to_string(),
        }
    }

    fn seed_server(api: &mut MockApi, name: &str, pages: &[&str], edits: u64) {
        api.categories.insert(
            name.to_string(),
            pages.iter().map(ToString::to_string).collect(),
        );
        if let Some(first) = pages.first() {
            api.recent_edits.insert((*first).to_string(), edits);
        }
        api.page_texts.insert(
            name.to_string(),
            format!("About {name}.\n[[Category:Live Servers]]"),
        );
    }

    #[test]
    fn missing_source_category_yields_empty_result() {
        let mut api = MockApi::default();
        let run = run_config();
        let mut outcome = RunOutcome::default();
        let servers =
            process_server_category(&mut api, &run, "Live Servers", &LiveCategoryHandler, &mut outcome)
                .expect("process");
        assert!(servers.is_empty());
        assert!(api.edits.is_empty());
    }

    #[test]
    fn sorts_by_recent_edits_then_total_pages() {
        let mut api = MockApi::default();
        api.categories.insert(
            "Live Servers".to_string(),
            vec![
                "Small".to_string(),
                "Busy".to_string(),
                "Large".to_string(),
            ],
        );
        seed_server(&mut api, "Busy", &["Busy"], 7);
        seed_server(&mut api, "Small", &["Small"], 2);
        seed_server(&mut api, "Large", &["Large", "Large/History"], 2);
        let run = run_config();
        let mut outcome = RunOutcome::default();

        let servers =
            process_server_category(&mut api, &run, "Live Servers", &LiveCategoryHandler, &mut outcome)
                .expect("process");

        let names: Vec<&str> = servers.iter().map(|server| server.name.as_str()).collect();
        assert_eq!(names, vec!["Busy", "Large", "Small"]);
        assert_eq!(servers[0].stats.recent_edits, 7);
        assert_eq!(servers[1].stats.total_pages, 2);
        assert_eq!(servers[2].stats.total_pages, 1);
    }

    #[test]
    fn excluded_members_are_skipped_entirely() {
        let mut api = MockApi::default();
        api.categories.insert(
            "Live Servers".to_string(),
            vec![
                "CivMC".to_string(),
                "Template:Infobox server".to_string(),
            ],
        );
        seed_server(&mut api, "CivMC", &["CivMC"], 3);
        // The template has no activity, so the handler would demote it if it
        // were ever dispatched.
        seed_server(&mut api, "Template:Infobox server", &["Template:Infobox server"], 0);
        let mut run = run_config();
        run.exclusions = vec!["Template:Infobox server".to_string()];
        let mut outcome = RunOutcome::default();

        let servers =
            process_server_category(&mut api, &run, "Live Servers", &LiveCategoryHandler, &mut outcome)
                .expect("process");

        assert_eq!(servers.len(), 1);
        assert_eq!(servers[0].name, "CivMC");
        assert!(api.edits.is_empty());
        assert!(outcome.moved_to_inactive.is_empty());
    }

    #[test]
    fn handler_is_not_dispatched_when_editing_is_disabled() {
        let mut api = MockApi::default();
        api.categories
            .insert("Live Servers".to_string(), vec!["CivIdle".to_string()]);
        seed_server(&mut api, "CivIdle", &["CivIdle"], 0);
        let mut run = run_config();
        run.should_edit_pages = false;
        let mut outcome = RunOutcome::default();

        let servers =
            process_server_category(&mut api, &run, "Live Servers", &LiveCategoryHandler, &mut outcome)
                .expect("process");

        assert_eq!(servers.len(), 1);
        assert!(api.edits.is_empty());
        assert!(outcome.moved_to_inactive.is_empty());
    }

    #[test]
    fn handler_sees_the_member_stats() {
        struct Recording(std::cell::RefCell<Vec<(String, u64)>>);
        impl CategoryHandler for Recording {
            fn handle(
                &self,
                _api: &mut dyn crate::client::WikiWriteApi,
                _run: &RunConfig,
                page: &str,
                recent_edits: u64,
                _outcome: &mut RunOutcome,
            ) -> anyhow::Result<()> {
                self.0.borrow_mut().push((page.to_string(), recent_edits));
                Ok(())
            }
        }

        let mut api = MockApi::default();
        api.categories.insert(
            "Live Servers".to_string(),
            vec!["Alpha".to_string(), "Beta".to_string()],
        );
        seed_server(&mut api, "Alpha", &["Alpha"], 2);
        seed_server(&mut api, "Beta", &["Beta"], 0);
        let run = run_config();
        let mut outcome = RunOutcome::default();
        let recording = Recording(Default::default());

        process_server_category(&mut api, &run, "Live Servers", &recording, &mut outcome)
            .expect("process");

        assert_eq!(
            recording.0.into_inner(),
            vec![("Alpha".to_string(), 2), ("Beta".to_string(), 0)]
        );
    }
}
