use eframe::egui::Ui;
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::data::model::RecordTable;

/// Render the whole dataset as a striped, scrollable grid.
pub fn dataset_table(ui: &mut Ui, table: &RecordTable) {
    ui.label(format!(
        "{} rows × {} columns",
        table.len(),
        table.columns().len()
    ));
    ui.add_space(4.0);

    let columns = table.columns();
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .column(TableColumn::auto().at_least(40.0))
        .columns(TableColumn::auto().at_least(80.0), columns.len())
        .header(22.0, |mut header| {
            header.col(|ui| {
                ui.strong("#");
            });
            for col in columns {
                header.col(|ui| {
                    ui.strong(&col.name);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, table.len(), |mut row| {
                let idx = row.index();
                row.col(|ui| {
                    ui.label(idx.to_string());
                });
                for col in columns {
                    row.col(|ui| {
                        ui.label(col.cell_text(idx));
                    });
                }
            });
        });
}
