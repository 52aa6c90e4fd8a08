use checksuite_core::DisplayTable;
use maud::html;

use crate::TableRenderer;

/// Plain `<table>` markup. Row-header columns become `<th>` cells.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlTableRenderer;

impl TableRenderer for HtmlTableRenderer {
    fn render(&self, table: &DisplayTable) -> String {
        html! {
            table {
                thead {
                    tr {
                        @for column in &table.columns {
                            th { (column) }
                        }
                    }
                }
                tbody {
                    @for row in &table.rows {
                        tr {
                            @for (i, cell) in row.iter().enumerate() {
                                @if i < table.index_width {
                                    th { (cell) }
                                } @else {
                                    td { (cell) }
                                }
                            }
                        }
                    }
                }
            }
        }
        .into_string()
    }
}
