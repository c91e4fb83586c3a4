//! [`RemoteForm`] implementation for the Formula Student teams site.
//!
//! Element ids below mirror the site's current ASP.NET markup and break
//! whenever the site changes it.

use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use bom_model::Row;
use bom_webdriver::{Condition, DriverConfig, Locator, WebDriver};

use crate::error::RemoteError;
use crate::remote::{Credentials, RemoteForm};

// URLs
pub const LOGIN_PAGE_URL: &str = "https://teams.formulastudent.com/Account/LogIn";
pub const WELCOME_PAGE_URL: &str = "https://teams.formulastudent.com/Account/Welcome";
pub const BOM_LIST_URL: &str = "https://teams.formulastudent.com/BOM/BOMList";

// Login page
const USERNAME_FIELD: &str = "ctl00_ContentPlaceHolder1_tbUsername";
const PASSWORD_FIELD: &str = "ctl00_ContentPlaceHolder1_tbPwd1";
const SUBMIT_CREDENTIALS_BUTTON: &str = "ctl00_ContentPlaceHolder1_btnSubmit";

// BoM list
const BOM_LIST_TABLE: &str = "bomListTable";
const NEW_SNAPSHOT_BUTTON_SELECTOR: &str = "input[value='Snapshot']";
const SNAPSHOT_LABEL_FIELD: &str = "ctl00_ContentPlaceHolder1_labelTextBox";
const MAKE_SNAPSHOT_BUTTON: &str = "ctl00_ContentPlaceHolder1_makeSnapshotButton";
const EDIT_BOM_BUTTON_XPATH: &str = ".//a[contains(text(), 'Edit')]";
/// Column of the BoM list holding the revision number.
const REVISION_COLUMN: usize = 2;

// BoM editor
const REFRESH_BUTTON: &str = "ctl00_cp_refreshButton";
const NEW_PART_BUTTON: &str = "newPartButton";
const NEW_ACTION_BUTTON: &str = "newActionButton";
const NEXT_PAGE_XPATH: &str = "//input[@title='Next Page']";
const WELCOME_TEXT: &str = "ctl00_ltwelcome";

// Part editor modal
const SYSTEM_DROPDOWN: &str = "ctl00_cp_systemDropDown";
const ASSEMBLY_DROPDOWN: &str = "assemblyDropDown";
const PART_NAME_FIELD: &str = "ctl00_cp_partName";
const QUANTITY_FIELD: &str = "ctl00_cp_qtyTextBox";
const COMMENT_FIELD: &str = "ctl00_cp_partComments";
const MAKE_RADIO_BUTTON: &str = "ctl00_cp_mbOptions_0";
const BUY_RADIO_BUTTON: &str = "ctl00_cp_mbOptions_1";
const COST_FIELD: &str = "ctl00_cp_CostTextBox";
const COST_COMMENT_FIELD: &str = "ctl00_cp_CostCommentsTextBox";
const SAVE_PART_BUTTON: &str = "ctl00_cp_savePartButton";

// Action editor modal
const ACTION_TYPE_DROPDOWN: &str = "ctl00_cp_partTypeDropDown";
const ACTION_SUBTYPE_FIELD: &str = "ctl00_cp_subTypeTextBox";
const ACTION_QUANTITY_FIELD: &str = "ctl00_cp_actionQty";
const ACTION_COMMENT_FIELD: &str = "ctl00_cp_actionComments";
const ACTION_COST_FIELD: &str = "ctl00_cp_actionCostTextBox";
const ACTION_COST_COMMENT_FIELD: &str = "ctl00_cp_actionCostComments";
const ACTION_CARBON_FOOTPRINT_FIELD: &str = "ctl00_cp_CarbonFootprintTextBox";
const ACTION_CARBON_COMMENT_FIELD: &str = "ctl00_cp_CarbonCommentsTextBox";
const SAVE_ACTION_BUTTON: &str = "ctl00_cp_saveActionButton";

/// Pause after the new-part button becomes clickable; the editor ignores
/// clicks while it is still binding handlers.
const NEW_PART_SETTLE: Duration = Duration::from_millis(500);

/// Upper bound on editor pages scanned when searching for a part.
pub const MAX_SEARCH_PAGES: usize = 200;

/// The teams site driven through a browser session.
pub struct TeamsSite {
    driver: WebDriver,
}

impl TeamsSite {
    pub fn new(driver: WebDriver) -> Self {
        Self { driver }
    }

    /// Opens a browser session for the site.
    ///
    /// # Errors
    ///
    /// Fails when the WebDriver server cannot start a session.
    pub fn connect(config: &DriverConfig) -> Result<Self, RemoteError> {
        Ok(Self::new(WebDriver::connect(config)?))
    }

    fn type_field(&self, id: &str, text: &str) -> Result<(), RemoteError> {
        self.driver.send_keys(&Locator::id(id), text, false)?;
        Ok(())
    }

    fn replace_field(&self, id: &str, text: &str) -> Result<(), RemoteError> {
        self.driver.send_keys(&Locator::id(id), text, true)?;
        Ok(())
    }

    fn click(&self, id: &str) -> Result<(), RemoteError> {
        self.driver.click(&Locator::id(id))?;
        Ok(())
    }

    fn wait_for_editor(&self) -> Result<(), RemoteError> {
        self.driver
            .wait_for_element(&Locator::id(REFRESH_BUTTON), Condition::Clickable)?;
        Ok(())
    }

    /// Clicks the snapshot button on the list row whose revision is `base_revision`.
    fn start_snapshot(&self, base_revision: u32) -> Result<(), RemoteError> {
        let driver = &self.driver;
        let table = driver.wait_for_element(&Locator::id(BOM_LIST_TABLE), Condition::Present)?;
        for row in driver.find_all_in(&table, &Locator::tag("tr"))? {
            let cells = driver.find_all_in(&row, &Locator::tag("td"))?;
            let Some(cell) = cells.get(REVISION_COLUMN) else {
                continue;
            };
            let revision = driver.element_text(cell)?;
            if revision.trim().parse::<u32>().ok() != Some(base_revision) {
                continue;
            }
            let button = driver.find_in(&row, &Locator::css(NEW_SNAPSHOT_BUTTON_SELECTOR))?;
            driver.click_element(&button)?;
            return Ok(());
        }
        Err(RemoteError::new(format!(
            "revision {base_revision} not found in the bill of materials list"
        )))
    }
}

impl RemoteForm for TeamsSite {
    fn log_in(&mut self, credentials: &Credentials) -> Result<(), RemoteError> {
        let driver = &self.driver;
        driver.navigate(LOGIN_PAGE_URL)?;
        driver.wait_for_element(&Locator::id(USERNAME_FIELD), Condition::Present)?;

        self.type_field(USERNAME_FIELD, &credentials.username)?;
        self.type_field(PASSWORD_FIELD, &credentials.password)?;
        self.click(SUBMIT_CREDENTIALS_BUTTON)?;

        if let Err(err) = driver.wait_for_url(WELCOME_PAGE_URL)
            && driver.current_url().ok().as_deref() != Some(WELCOME_PAGE_URL)
        {
            return Err(RemoteError::new(format!(
                "login failed; check that the username and password are correct ({err})"
            )));
        }
        Ok(())
    }

    fn create_snapshot(&mut self, base_revision: u32, label: &str) -> Result<(), RemoteError> {
        let driver = &self.driver;
        driver.navigate(BOM_LIST_URL)?;
        self.start_snapshot(base_revision)?;

        self.type_field(SNAPSHOT_LABEL_FIELD, label)?;
        self.click(MAKE_SNAPSHOT_BUTTON)?;

        // The list only shows the new snapshot after navigating away and back.
        driver.navigate(WELCOME_PAGE_URL)?;
        driver.wait_for_url(WELCOME_PAGE_URL)?;
        driver.navigate(BOM_LIST_URL)?;
        let table = driver.wait_for_element(&Locator::id(BOM_LIST_TABLE), Condition::Present)?;
        let edit = driver.find_in(&table, &Locator::xpath(EDIT_BOM_BUTTON_XPATH))?;
        driver.click_element(&edit)?;
        Ok(())
    }

    fn create_part(
        &mut self,
        row: &Row,
        system: &str,
        assembly: &str,
        upload_cost: bool,
    ) -> Result<(), RemoteError> {
        self.click(REFRESH_BUTTON)?;

        self.driver
            .wait_for_element(&Locator::id(NEW_PART_BUTTON), Condition::Clickable)?;
        thread::sleep(NEW_PART_SETTLE);
        self.click(NEW_PART_BUTTON)?;
        self.driver
            .wait_for_element(&Locator::id(SAVE_PART_BUTTON), Condition::Present)?;

        self.type_field(SYSTEM_DROPDOWN, system)?;
        self.type_field(ASSEMBLY_DROPDOWN, assembly)?;
        self.type_field(PART_NAME_FIELD, row.part())?;
        debug!(quantity = row.quantity(), "entering quantity");
        self.replace_field(QUANTITY_FIELD, &row.quantity().to_string())?;
        self.type_field(COMMENT_FIELD, row.comment())?;
        if row.is_bought() {
            debug!("selecting buy");
            self.click(BUY_RADIO_BUTTON)?;
            if upload_cost {
                self.type_field(COST_FIELD, &format_decimal(row.cost()))?;
                self.type_field(COST_COMMENT_FIELD, row.cost_comment())?;
            }
        } else {
            debug!("selecting make");
            self.click(MAKE_RADIO_BUTTON)?;
        }

        self.click(SAVE_PART_BUTTON)?;
        self.wait_for_editor()
    }

    fn select_part(&mut self, name: &str) -> Result<bool, RemoteError> {
        let driver = &self.driver;
        let label = Locator::xpath(part_label_xpath(name));
        for page in 1..=MAX_SEARCH_PAGES {
            self.wait_for_editor()?;
            match driver.find(&label) {
                Ok(part_row) => {
                    // Deselect whatever row is active before selecting the part.
                    self.click(WELCOME_TEXT)?;
                    driver.click_element(&part_row)?;
                    return Ok(true);
                }
                Err(err) if err.is_no_such_element() => {}
                Err(err) => return Err(err.into()),
            }
            if let Err(err) = driver.click(&Locator::xpath(NEXT_PAGE_XPATH)) {
                debug!(page, error = %err, "next page button not found or no more pages");
                return Ok(false);
            }
        }
        warn!(part = name, pages = MAX_SEARCH_PAGES, "gave up searching for part");
        Ok(false)
    }

    fn create_step(&mut self, row: &Row, upload_cost: bool) -> Result<(), RemoteError> {
        self.click(NEW_ACTION_BUTTON)?;
        self.driver
            .wait_for_element(&Locator::id(SAVE_ACTION_BUTTON), Condition::Present)?;

        self.type_field(ACTION_TYPE_DROPDOWN, row.step_type())?;
        self.type_field(ACTION_SUBTYPE_FIELD, row.subtype())?;
        self.replace_field(ACTION_QUANTITY_FIELD, &row.quantity().to_string())?;
        self.type_field(ACTION_COMMENT_FIELD, row.comment())?;
        if upload_cost {
            self.type_field(ACTION_COST_FIELD, &format_decimal(row.cost()))?;
            self.type_field(ACTION_COST_COMMENT_FIELD, row.cost_comment())?;
            self.type_field(
                ACTION_CARBON_FOOTPRINT_FIELD,
                &format_decimal(row.carbon_footprint()),
            )?;
            self.type_field(ACTION_CARBON_COMMENT_FIELD, row.carbon_comment())?;
        }

        self.click(SAVE_ACTION_BUTTON)?;
        self.wait_for_editor()
    }

    fn close(&mut self) -> Result<(), RemoteError> {
        self.driver.quit()?;
        Ok(())
    }

    fn detach(&mut self) {
        self.driver.detach();
    }
}

/// XPath matching the part-name label of `name` in the editor table.
pub fn part_label_xpath(name: &str) -> String {
    format!(
        "//span[contains(@id, '_partNameLabel') and text()={}]",
        xpath_literal(name)
    )
}

/// Quotes `value` as an XPath 1.0 string literal.
///
/// XPath has no escape sequences, so values containing both quote kinds are
/// assembled with `concat()`.
pub fn xpath_literal(value: &str) -> String {
    if !value.contains('\'') {
        return format!("'{value}'");
    }
    if !value.contains('"') {
        return format!("\"{value}\"");
    }
    let parts: Vec<String> = value
        .split('\'')
        .map(|piece| format!("'{piece}'"))
        .collect();
    format!("concat({})", parts.join(", \"'\", "))
}

/// Renders a decimal for a form field; blank (NaN) cells stay blank.
pub fn format_decimal(value: f64) -> String {
    if value.is_finite() {
        value.to_string()
    } else {
        String::new()
    }
}
