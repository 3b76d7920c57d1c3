use tabled::{
    Table,
    settings::{Alignment, Style, object::Rows},
};

/// Consistent styling for all tables printed by meroctl
pub(crate) trait MeroctlTable {
    fn styled(&mut self) -> &mut Self;
}

impl MeroctlTable for Table {
    fn styled(&mut self) -> &mut Self {
        self.with(Style::psql())
            .modify(Rows::first(), Alignment::center())
    }
}
