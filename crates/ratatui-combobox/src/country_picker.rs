//! Country calling-code picker for phone-number inputs.
//!
//! Options are keyed by ISO 3166-1 alpha-2 code and searched by country name. The trigger shows
//! the selected dial code; rows show `+DIAL  Name (ISO)`.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui_combobox_core::binding::ValueBinding;
use ratatui_combobox_core::controller::ChangeMeta;
use ratatui_combobox_core::controller::DropdownAction;
use ratatui_combobox_core::controller::DropdownController;
use ratatui_combobox_core::controller::DropdownOptions;
use ratatui_combobox_core::error::BindingError;
use ratatui_combobox_core::error::CatalogError;
use ratatui_combobox_core::input::InputEvent;
use ratatui_combobox_core::option::OptionCatalog;
use ratatui_combobox_core::option::SelectOption;
use ratatui_combobox_core::selection::Selection;

use crate::panel;
use crate::panel::RenderedAnchor;
use crate::panel::RowContent;
use crate::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Country {
    pub iso: &'static str,
    pub name: &'static str,
    /// Calling code without the leading `+`.
    pub dial: &'static str,
}

const fn country(iso: &'static str, name: &'static str, dial: &'static str) -> Country {
    Country { iso, name, dial }
}

pub const COUNTRIES: &[Country] = &[
    country("AR", "Argentina", "54"),
    country("AU", "Australia", "61"),
    country("BR", "Brazil", "55"),
    country("CA", "Canada", "1"),
    country("CN", "China", "86"),
    country("DE", "Germany", "49"),
    country("EG", "Egypt", "20"),
    country("ES", "Spain", "34"),
    country("FR", "France", "33"),
    country("GB", "United Kingdom", "44"),
    country("IN", "India", "91"),
    country("IT", "Italy", "39"),
    country("JP", "Japan", "81"),
    country("KE", "Kenya", "254"),
    country("KR", "South Korea", "82"),
    country("MX", "Mexico", "52"),
    country("NG", "Nigeria", "234"),
    country("NL", "Netherlands", "31"),
    country("PL", "Poland", "48"),
    country("SE", "Sweden", "46"),
    country("SG", "Singapore", "65"),
    country("US", "United States", "1"),
    country("ZA", "South Africa", "27"),
];

const DIAL_COLUMN: u16 = 6;

#[derive(Debug)]
pub struct CountryPicker {
    dropdown: DropdownController<&'static str>,
    countries: Vec<Country>,
    anchor: RenderedAnchor,
}

impl CountryPicker {
    /// Picker over [`COUNTRIES`], searchable.
    pub fn new() -> Result<Self, CatalogError> {
        Self::with_countries(COUNTRIES.to_vec(), Self::default_options())
    }

    pub fn default_options() -> DropdownOptions {
        DropdownOptions {
            searchable: true,
            placeholder: "+--".to_string(),
            search_placeholder: "Search countries...".to_string(),
            ..Default::default()
        }
    }

    /// Fails when two countries share an ISO code or a name is blank.
    pub fn with_countries(
        countries: Vec<Country>,
        options: DropdownOptions,
    ) -> Result<Self, CatalogError> {
        let catalog = OptionCatalog::new(
            countries
                .iter()
                .map(|c| SelectOption::new(c.iso, c.name))
                .collect(),
        )?;
        Ok(Self {
            dropdown: DropdownController::uncontrolled(catalog, Selection::Single(None), options),
            countries,
            anchor: RenderedAnchor::default(),
        })
    }

    pub fn with_default_country(mut self, iso: &'static str) -> Self {
        let binding = ValueBinding::uncontrolled(Selection::single(iso));
        self.dropdown = self.dropdown.with_binding(binding);
        self
    }

    /// Controlled: the displayed country changes only through [`CountryPicker::set_country`].
    pub fn with_country(mut self, iso: Option<&'static str>) -> Self {
        let binding = ValueBinding::controlled(Selection::Single(iso));
        self.dropdown = self.dropdown.with_binding(binding);
        self
    }

    pub fn set_on_change(
        &mut self,
        f: impl FnMut(&Selection<&'static str>, &ChangeMeta<&'static str>) + 'static,
    ) {
        self.dropdown.set_on_change(f);
    }

    pub fn set_country(&mut self, iso: Option<&'static str>) -> Result<(), BindingError> {
        self.dropdown.sync_value(Some(Selection::Single(iso)))
    }

    pub fn country(&self) -> Option<&Country> {
        let iso = self.dropdown.selection().values().first()?;
        self.lookup(iso)
    }

    /// `+49` style code of the selected country.
    pub fn dial_code(&self) -> Option<String> {
        self.country().map(|c| format!("+{}", c.dial))
    }

    pub fn controller(&self) -> &DropdownController<&'static str> {
        &self.dropdown
    }

    pub fn controller_mut(&mut self) -> &mut DropdownController<&'static str> {
        &mut self.dropdown
    }

    pub fn handle_event(&mut self, event: InputEvent) -> DropdownAction<&'static str> {
        self.dropdown.dispatch(event)
    }

    pub fn on_frame(&mut self) -> DropdownAction<&'static str> {
        self.dropdown.on_frame(&self.anchor)
    }

    pub fn render(&mut self, area: Rect, frame: Rect, buf: &mut Buffer, theme: &Theme) {
        self.anchor = RenderedAnchor {
            trigger: Some(area),
            frame,
        };
        self.dropdown.set_layout(area, frame);
        let dial = self.dial_code();
        panel::render_trigger(area, buf, theme, &self.dropdown, dial.as_deref());

        let countries = &self.countries;
        panel::render_panel(buf, theme, &self.dropdown, |opt, _| {
            row_content(countries, opt.value, &opt.label)
        });
    }

    fn lookup(&self, iso: &str) -> Option<&Country> {
        self.countries.iter().find(|c| c.iso == iso)
    }
}

fn row_content(countries: &[Country], iso: &str, name: &str) -> RowContent {
    let dial = countries
        .iter()
        .find(|c| c.iso == iso)
        .map(|c| format!("+{}", c.dial))
        .unwrap_or_default();
    RowContent::Prefixed {
        prefix: dial,
        width: DIAL_COLUMN,
        label: format!("{name} ({iso})"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_list_is_a_valid_catalog() {
        let picker = CountryPicker::new().unwrap();
        assert_eq!(picker.controller().catalog().len(), COUNTRIES.len());
        assert!(picker.controller().options().searchable);
    }

    #[test]
    fn search_matches_country_names_only() {
        let mut picker = CountryPicker::new().unwrap();
        let dd = picker.controller_mut();
        dd.open();
        dd.set_query("united");
        let isos: Vec<&str> = dd.visible().iter().map(|o| o.value).collect();
        assert_eq!(isos, ["GB", "US"]);

        dd.set_query("49");
        assert_eq!(dd.visible_len(), 0);
    }

    #[test]
    fn dial_code_follows_selection() {
        let mut picker = CountryPicker::new().unwrap().with_default_country("DE");
        assert_eq!(picker.dial_code().as_deref(), Some("+49"));
        picker.controller_mut().toggle(&"KE");
        assert_eq!(picker.dial_code().as_deref(), Some("+254"));
    }

    #[test]
    fn duplicate_iso_codes_are_rejected() {
        let countries = vec![country("US", "United States", "1"), country("US", "USA", "1")];
        let err = CountryPicker::with_countries(countries, CountryPicker::default_options())
            .unwrap_err();
        assert_eq!(err, CatalogError::DuplicateValue { index: 1, first: 0 });
    }

    #[test]
    fn rows_lead_with_the_dial_code() {
        assert_eq!(
            row_content(COUNTRIES, "FR", "France"),
            RowContent::Prefixed {
                prefix: "+33".to_string(),
                width: DIAL_COLUMN,
                label: "France (FR)".to_string(),
            }
        );
    }
}
