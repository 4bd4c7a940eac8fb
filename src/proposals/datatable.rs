//! Column layout and cell rendering for the proposal list

use serde::Serialize;
use std::cmp::Ordering;

use crate::core::entity::Entity;
use crate::core::i18n::Translator;
use crate::core::query::{SortDirection, TableQuery, TableResult};
use crate::proposals::repository::{ProposalListing, ProposalRow};

const NOTES_PREVIEW_CHARS: usize = 50;

/// Static column definition
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub name: &'static str,
    /// Translation key of the header
    pub title_key: &'static str,
    pub sortable: bool,
}

/// Column as handed to the list view
#[derive(Debug, Clone, Serialize)]
pub struct ColumnView {
    pub name: &'static str,
    pub title: String,
    pub sortable: bool,
}

/// What the list view needs to load rows lazily
#[derive(Debug, Clone, Serialize)]
pub struct DatatableDescriptor {
    pub source_url: String,
    pub columns: Vec<ColumnView>,
}

const COLUMNS: &[Column] = &[
    Column { name: "checkbox", title_key: "", sortable: false },
    Column { name: "quote", title_key: "quote", sortable: true },
    Column { name: "client", title_key: "client", sortable: true },
    Column { name: "template", title_key: "template", sortable: true },
    Column { name: "created_at", title_key: "created_at", sortable: true },
    Column { name: "private_notes", title_key: "private_notes", sortable: false },
    Column { name: "status", title_key: "status", sortable: false },
];

/// Datatable definition for proposals
pub struct ProposalDatatable;

impl ProposalDatatable {
    pub fn columns() -> &'static [Column] {
        COLUMNS
    }

    pub fn descriptor(translator: &Translator) -> DatatableDescriptor {
        DatatableDescriptor {
            source_url: "/proposals/datatable".to_string(),
            columns: COLUMNS
                .iter()
                .map(|c| ColumnView {
                    name: c.name,
                    title: if c.title_key.is_empty() {
                        String::new()
                    } else {
                        translator.trans(c.title_key, &[])
                    },
                    sortable: c.sortable,
                })
                .collect(),
        }
    }

    /// Sort, page and render a listing
    pub fn build(listing: ProposalListing, query: &TableQuery, translator: &Translator) -> TableResult {
        let ProposalListing { total, mut rows } = listing;
        Self::sort(&mut rows, query.sort_column, query.sort_direction);

        let total_display_records = rows.len();
        let data = query
            .paginate(rows)
            .iter()
            .map(|row| Self::render_row(row, translator))
            .collect();

        TableResult {
            echo: query.echo,
            total_records: total,
            total_display_records,
            data,
        }
    }

    /// Sort rows in place; unsortable or unknown columns sort by creation date
    pub fn sort(rows: &mut [ProposalRow], column: Option<usize>, direction: SortDirection) {
        let column = column
            .and_then(|i| COLUMNS.get(i))
            .filter(|c| c.sortable)
            .map(|c| c.name)
            .unwrap_or("created_at");

        rows.sort_by(|a, b| {
            let ordering = match column {
                "quote" => cmp_text(&a.quote_number, &b.quote_number),
                "client" => cmp_text(&a.client_name, &b.client_name),
                "template" => cmp_text(&a.template_name, &b.template_name),
                _ => a.proposal.created_at.cmp(&b.proposal.created_at),
            }
            .then(a.proposal.public_id.cmp(&b.proposal.public_id));

            match direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
    }

    pub fn render_row(row: &ProposalRow, translator: &Translator) -> Vec<String> {
        let proposal = &row.proposal;
        let edit_url = format!("{}/edit", proposal.route());

        let quote = match &row.quote_number {
            Some(number) => format!("<a href=\"{}\">{}</a>", edit_url, tera::escape_html(number)),
            None => String::new(),
        };

        vec![
            proposal.public_id.to_string(),
            quote,
            escape_opt(&row.client_name),
            escape_opt(&row.template_name),
            proposal.created_at.format("%Y-%m-%d").to_string(),
            tera::escape_html(&preview(&proposal.private_notes)),
            translator.trans(proposal.state().as_str(), &[]),
        ]
    }
}

fn cmp_text(a: &Option<String>, b: &Option<String>) -> Ordering {
    let a = a.as_deref().unwrap_or_default().to_lowercase();
    let b = b.as_deref().unwrap_or_default().to_lowercase();
    a.cmp(&b)
}

fn escape_opt(value: &Option<String>) -> String {
    value.as_deref().map(tera::escape_html).unwrap_or_default()
}

fn preview(text: &str) -> String {
    if text.chars().count() <= NOTES_PREVIEW_CHARS {
        return text.to_string();
    }
    let truncated: String = text.chars().take(NOTES_PREVIEW_CHARS).collect();
    format!("{}...", truncated.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::{BulkAction, EntityState};
    use crate::entities::Proposal;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn row(public_id: u32, quote: &str, client: &str, age_days: i64) -> ProposalRow {
        let mut proposal = Proposal::new(Uuid::nil(), Uuid::nil(), public_id);
        proposal.created_at = Utc::now() - Duration::days(age_days);
        ProposalRow {
            proposal,
            quote_number: Some(quote.to_string()),
            client_name: Some(client.to_string()),
            template_name: None,
        }
    }

    fn ids(rows: &[ProposalRow]) -> Vec<u32> {
        rows.iter().map(|r| r.proposal.public_id).collect()
    }

    #[test]
    fn test_default_sort_is_newest_first() {
        let mut rows = vec![row(1, "Q1", "b", 3), row(2, "Q2", "a", 1), row(3, "Q3", "c", 2)];
        ProposalDatatable::sort(&mut rows, None, SortDirection::Desc);
        assert_eq!(ids(&rows), vec![2, 3, 1]);
    }

    #[test]
    fn test_sort_by_client_asc() {
        let mut rows = vec![row(1, "Q1", "beta", 3), row(2, "Q2", "Alpha", 1), row(3, "Q3", "gamma", 2)];
        ProposalDatatable::sort(&mut rows, Some(2), SortDirection::Asc);
        assert_eq!(ids(&rows), vec![2, 1, 3]);
    }

    #[test]
    fn test_unsortable_column_falls_back() {
        let mut rows = vec![row(1, "Q1", "b", 1), row(2, "Q2", "a", 5)];
        ProposalDatatable::sort(&mut rows, Some(6), SortDirection::Asc);
        assert_eq!(ids(&rows), vec![2, 1]);
    }

    #[test]
    fn test_render_row_escapes() {
        let t = Translator::english();
        let mut r = row(7, "<Q7>", "Tom & Jerry", 0);
        r.proposal.private_notes = "x".repeat(60);
        let cells = ProposalDatatable::render_row(&r, &t);

        assert_eq!(cells.len(), ProposalDatatable::columns().len());
        assert_eq!(cells[0], "7");
        assert_eq!(cells[1], "<a href=\"/proposals/7/edit\">&lt;Q7&gt;</a>");
        assert_eq!(cells[2], "Tom &amp; Jerry");
        assert!(cells[5].ends_with("..."));
        assert_eq!(cells[6], "Active");
    }

    #[test]
    fn test_build_pages_and_counts() {
        let t = Translator::english();
        let rows: Vec<ProposalRow> = (1..=5).map(|i| row(i, "Q", "c", i as i64)).collect();
        let listing = ProposalListing { total: 8, rows };
        let query = TableQuery {
            echo: 4,
            start: 2,
            length: Some(2),
            ..TableQuery::default()
        };

        let result = ProposalDatatable::build(listing, &query, &t);
        assert_eq!(result.echo, 4);
        assert_eq!(result.total_records, 8);
        assert_eq!(result.total_display_records, 5);
        assert_eq!(result.data.len(), 2);
        assert_eq!(result.data[0][0], "3");
    }

    #[test]
    fn test_status_cell_reflects_state() {
        let t = Translator::english();
        let mut r = row(1, "Q", "c", 0);
        let next = r.proposal.state().transition(BulkAction::Archive).unwrap();
        r.proposal.set_state(next);
        assert_eq!(r.proposal.state(), EntityState::Archived);
        assert_eq!(ProposalDatatable::render_row(&r, &t)[6], "Archived");
    }

    #[test]
    fn test_descriptor_titles() {
        let d = ProposalDatatable::descriptor(&Translator::english());
        assert_eq!(d.source_url, "/proposals/datatable");
        assert_eq!(d.columns[1].title, "Quote");
        assert_eq!(d.columns[0].title, "");
    }
}
