use anyhow::Result;

use crate::client::WikiWriteApi;
use crate::config::RunConfig;

/// Pages that changed state during this run. Collected by the handlers and
/// consumed by the report builder to place servers by post-flip state.
#[derive(Debug, Default, Clone)]
pub struct RunOutcome {
    pub moved_to_live: Vec<String>,
    pub moved_to_inactive: Vec<String>,
}

/// Per-page classification step. One implementation per source category,
/// selected by the caller for each pass.
pub trait CategoryHandler {
    fn handle(
        &self,
        api: &mut dyn WikiWriteApi,
        run: &RunConfig,
        page: &str,
        recent_edits: u64,
        outcome: &mut RunOutcome,
    ) -> Result<()>;
}

/// Demotes live servers whose category fell below the edit threshold.
pub struct LiveCategoryHandler;

/// Promotes inactive servers whose category cleared the edit threshold.
pub struct InactiveCategoryHandler;

impl CategoryHandler for LiveCategoryHandler {
    fn handle(
        &self,
        api: &mut dyn WikiWriteApi,
        run: &RunConfig,
        page: &str,
        recent_edits: u64,
        outcome: &mut RunOutcome,
    ) -> Result<()> {
        if recent_edits >= run.minimum_edits {
            return Ok(());
        }
        let Some(text) = api.get_page_text(page)? else {
            println!("Page {page} no longer exists, leaving it untouched");
            return Ok(());
        };
        let updated = swap_category_tag(&text, &run.live_category, &run.inactive_category);
        if updated == text {
            println!(
                "No [[Category:{}]] tag found on {page}, submitting unchanged text",
                run.live_category
            );
        }
        api.edit_page(
            page,
            &updated,
            &format!(
                "Set the server as inactive due to the category not having any edits in the last {} days.",
                run.days_cutoff
            ),
        )?;
        outcome.moved_to_inactive.push(page.to_string());
        Ok(())
    }
}

impl CategoryHandler for InactiveCategoryHandler {
    fn handle(
        &self,
        api: &mut dyn WikiWriteApi,
        run: &RunConfig,
        page: &str,
        recent_edits: u64,
        outcome: &mut RunOutcome,
    ) -> Result<()> {
        if recent_edits < run.minimum_edits {
            println!(
                "Server {page} did not have enough required edits ({recent_edits}/{})",
                run.minimum_edits
            );
            return Ok(());
        }
        let Some(text) = api.get_page_text(page)? else {
            println!("Page {page} no longer exists, leaving it untouched");
            return Ok(());
        };
        let updated = swap_category_tag(&text, &run.inactive_category, &run.live_category);
        if updated == text {
            println!(
                "No [[Category:{}]] tag found on {page}, submitting unchanged text",
                run.inactive_category
            );
        }
        api.edit_page(
            page,
            &updated,
            &format!("Server {page} was previously inactive but now had {recent_edits} page edits."),
        )?;
        outcome.moved_to_live.push(page.to_string());
        Ok(())
    }
}

/// Literal `[[Category:from]]` to `[[Category:to]]` substitution on the full
/// page body. No match means no change.
pub fn swap_category_tag(text: &str, from: &str, to: &str) -> String {
    text.replace(
        &format!("[[Category:{from}]]"),
        &format!("[[Category:{to}]]"),
    )
}
