//! `ratatui-combobox` draws dropdowns on top of the headless engine in `ratatui-combobox-core`.
//!
//! Front-ends:
//! - [`select::Select`]: pick one option; the panel closes on selection.
//! - [`multi_select::MultiSelect`]: checkbox list with select-all / clear-all.
//! - [`country_picker::CountryPicker`]: calling-code picker for phone inputs.
//!
//! Every front-end is driven the same way:
//!
//! ```ignore
//! let action = select.handle_event(ev);   // for each input event
//! terminal.draw(|f| select.render(trigger, f.area(), f.buffer_mut(), &theme))?;
//! if select.on_frame().needs_redraw() {  // after each frame
//!     // draw again: the panel was just placed
//! }
//! ```
pub use ratatui_combobox_core as engine;
pub use ratatui_combobox_core::controller::ChangeMeta;
pub use ratatui_combobox_core::controller::DropdownAction;
pub use ratatui_combobox_core::controller::DropdownOptions;
pub use ratatui_combobox_core::error::CatalogError;
pub use ratatui_combobox_core::option::OptionCatalog;
pub use ratatui_combobox_core::option::SelectOption;
pub use ratatui_combobox_core::selection::Selection;

pub mod theme;

pub mod panel;
pub mod render;

pub mod country_picker;
pub mod multi_select;
pub mod select;
