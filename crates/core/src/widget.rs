use crate::error::Result;
use crate::schema::ReadingSchema;

/// Every display consumer implements this trait.
///
/// Widgets are purely reactive: they receive a read-only view of
/// [`DashState`](crate::DashState) and format it. The only thing the core needs
/// to know about them is which columns they address, so a stale column name is
/// caught at startup instead of at render time.
pub trait DashWidget: Send + Sync + std::fmt::Debug {
    /// Unique string identifier, e.g. `"value_box"` or `"trend_chart"`.
    fn id(&self) -> &str;

    /// Reading columns this widget reads by name.
    fn referenced_columns(&self) -> Vec<&str> {
        Vec::new()
    }

    /// Check the referenced columns against `schema`. Widgets that cannot
    /// show the derived trend column narrow this to the base columns.
    fn validate(&self, schema: &ReadingSchema) -> Result<()> {
        schema.validate(self.id(), self.referenced_columns())
    }
}

/// Validate every widget against `schema`; the first mismatch wins.
pub fn validate_widgets(schema: &ReadingSchema, widgets: &[&dyn DashWidget]) -> Result<()> {
    schema.check()?;
    for widget in widgets {
        widget.validate(schema)?;
    }
    Ok(())
}
