use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt};
use ts_rs::TS;
use utoipa::ToSchema;

/// Rows per page when a view is built without an explicit size.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// FieldValue
///
/// Raw value of one attribute of a row. `Missing` stands for an absent or undefined field:
/// it never matches a search and sorts before every defined value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Missing,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl FieldValue {
    pub fn is_missing(&self) -> bool {
        matches!(self, FieldValue::Missing)
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Int(n) => Some(*n as f64),
            FieldValue::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Natural ordering: numeric when both sides are numbers, lexicographic on the string forms
    /// otherwise, `Missing` first. NaN sorts after every other number.
    pub fn compare(&self, other: &FieldValue) -> Ordering {
        match (self, other) {
            (FieldValue::Missing, FieldValue::Missing) => Ordering::Equal,
            (FieldValue::Missing, _) => Ordering::Less,
            (_, FieldValue::Missing) => Ordering::Greater,
            _ => match (self.as_number(), other.as_number()) {
                (Some(a), Some(b)) => match (a.is_nan(), b.is_nan()) {
                    (false, false) => a.total_cmp(&b),
                    (a_nan, b_nan) => a_nan.cmp(&b_nan),
                },
                _ => self.to_string().cmp(&other.to_string()),
            },
        }
    }

    /// Case-insensitive containment of an already lower-cased, non-empty needle. Only missing
    /// and empty values are skipped, so `false` and `0` match through their string forms.
    fn contains_lowercase(&self, needle: &str) -> bool {
        match self {
            FieldValue::Missing => false,
            FieldValue::Text(s) if s.is_empty() => false,
            value => value.to_string().to_lowercase().contains(needle),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Missing => Ok(()),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Int(n) => write!(f, "{}", n),
            FieldValue::Float(n) => write!(f, "{}", n),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&String> for FieldValue {
    fn from(value: &String) -> Self {
        FieldValue::Text(value.clone())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Int(value.into())
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::Int(value.into())
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Missing, Into::into)
    }
}

/// Record
///
/// Field access for rows shown in a `TabularView`. `fields` enumerates every attribute of the
/// row (searching looks at all of them, not only the displayed columns); `field` looks one up
/// by key and yields `Missing` for unknown keys.
pub trait Record {
    fn fields(&self) -> Vec<(&'static str, FieldValue)>;

    fn field(&self, key: &str) -> FieldValue {
        self.fields()
            .into_iter()
            .find(|(name, _)| *name == key)
            .map_or(FieldValue::Missing, |(_, value)| value)
    }
}

type Renderer<T> = Box<dyn Fn(&FieldValue, &T) -> String + Send + Sync>;

/// Column
///
/// Descriptor for one displayed field. Without a renderer a cell shows the value's string
/// form (empty for `Missing`).
pub struct Column<T> {
    pub header: String,
    pub field_key: &'static str,
    pub sortable: bool,
    renderer: Option<Renderer<T>>,
}

impl<T: Record> Column<T> {
    pub fn new(header: impl Into<String>, field_key: &'static str) -> Self {
        Self {
            header: header.into(),
            field_key,
            sortable: false,
            renderer: None,
        }
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    pub fn render_with<F>(mut self, renderer: F) -> Self
    where
        F: Fn(&FieldValue, &T) -> String + Send + Sync + 'static,
    {
        self.renderer = Some(Box::new(renderer));
        self
    }

    /// Renders this column's cell for `row`.
    pub fn render(&self, row: &T) -> String {
        let value = row.field(self.field_key);
        match &self.renderer {
            Some(renderer) => renderer(&value, row),
            None => value.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub enum SortDirection {
    #[default]
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
}

impl SortDirection {
    fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// ViewState
///
/// Ephemeral search/sort/page state owned by one `TabularView`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub search_term: String,
    pub sort_field: Option<&'static str>,
    pub sort_direction: SortDirection,
    pub current_page: usize,
    pub page_size: usize,
}

/// VisibleSlice
///
/// The rows on the current page plus pagination metadata.
#[derive(Debug)]
pub struct VisibleSlice<'a, T> {
    pub rows: Vec<&'a T>,
    pub total_filtered_count: usize,
    pub current_page: usize,
    pub total_pages: usize,
}

/// ColumnHeader
///
/// Header cell of a rendered page; `sorted` is set on the active sort column.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ColumnHeader {
    pub header: String,
    pub field_key: String,
    pub sortable: bool,
    pub sorted: Option<SortDirection>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct RenderedRow {
    /// Value of the view's key field, for row identity on the client.
    pub key: String,
    pub cells: Vec<String>,
}

/// TablePage
///
/// Serializable rendering of the visible slice, as returned by listing views.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TablePage {
    pub columns: Vec<ColumnHeader>,
    pub rows: Vec<RenderedRow>,
    pub total_filtered_count: usize,
    pub current_page: usize,
    pub total_pages: usize,
    pub page_size: usize,
    pub search_term: String,
}

/// TabularView
///
/// Generic list engine: filter, then sort, then paginate. The filtered and sorted order is
/// recomputed eagerly on every state change, so `visible_slice` only slices.
///
/// Invariant: `1 <= current_page <= total_pages()`.
pub struct TabularView<T> {
    columns: Vec<Column<T>>,
    key_field: &'static str,
    rows: Vec<T>,
    state: ViewState,
    // Indices into `rows`, filtered and sorted.
    ordered: Vec<usize>,
}

impl<T: Record> TabularView<T> {
    /// A view over no rows. A `page_size` of zero is raised to one.
    pub fn new(columns: Vec<Column<T>>, key_field: &'static str, page_size: usize) -> Self {
        Self {
            columns,
            key_field,
            rows: Vec::new(),
            state: ViewState {
                search_term: String::new(),
                sort_field: None,
                sort_direction: SortDirection::Ascending,
                current_page: 1,
                page_size: page_size.max(1),
            },
            ordered: Vec::new(),
        }
    }

    pub fn with_rows(mut self, rows: Vec<T>) -> Self {
        self.set_rows(rows);
        self
    }

    /// Replaces the collection, keeping search and sort; the current page is clamped.
    pub fn set_rows(&mut self, rows: Vec<T>) {
        self.rows = rows;
        self.recompute();
    }

    pub fn view_state(&self) -> &ViewState {
        &self.state
    }

    pub fn columns(&self) -> &[Column<T>] {
        &self.columns
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.state.search_term = term.into();
        self.state.current_page = 1;
        self.recompute();
    }

    /// Sorts by `field_key`, flipping the direction when it is already the sort field.
    /// Unknown and non-sortable columns are ignored.
    pub fn toggle_sort(&mut self, field_key: &str) {
        let Some(column) = self
            .columns
            .iter()
            .find(|c| c.field_key == field_key && c.sortable)
        else {
            return;
        };

        if self.state.sort_field == Some(column.field_key) {
            self.state.sort_direction = self.state.sort_direction.flipped();
        } else {
            self.state.sort_field = Some(column.field_key);
            self.state.sort_direction = SortDirection::Ascending;
        }
        self.recompute();
    }

    pub fn set_page(&mut self, page: usize) {
        self.state.current_page = page.clamp(1, self.total_pages());
    }

    pub fn total_filtered_count(&self) -> usize {
        self.ordered.len()
    }

    pub fn total_pages(&self) -> usize {
        self.ordered.len().div_ceil(self.state.page_size).max(1)
    }

    pub fn visible_slice(&self) -> VisibleSlice<'_, T> {
        let start = (self.state.current_page - 1) * self.state.page_size;
        let rows = self
            .ordered
            .iter()
            .skip(start)
            .take(self.state.page_size)
            .map(|&i| &self.rows[i])
            .collect();

        VisibleSlice {
            rows,
            total_filtered_count: self.total_filtered_count(),
            current_page: self.state.current_page,
            total_pages: self.total_pages(),
        }
    }

    /// Runs every column renderer over the visible slice.
    pub fn render_page(&self) -> TablePage {
        let slice = self.visible_slice();
        let columns = self
            .columns
            .iter()
            .map(|c| ColumnHeader {
                header: c.header.clone(),
                field_key: c.field_key.to_string(),
                sortable: c.sortable,
                sorted: (self.state.sort_field == Some(c.field_key))
                    .then_some(self.state.sort_direction),
            })
            .collect();
        let rows = slice
            .rows
            .iter()
            .map(|row| RenderedRow {
                key: row.field(self.key_field).to_string(),
                cells: self.columns.iter().map(|c| c.render(row)).collect(),
            })
            .collect();

        TablePage {
            columns,
            rows,
            total_filtered_count: slice.total_filtered_count,
            current_page: slice.current_page,
            total_pages: slice.total_pages,
            page_size: self.state.page_size,
            search_term: self.state.search_term.clone(),
        }
    }

    fn recompute(&mut self) {
        let needle = self.state.search_term.to_lowercase();
        let mut ordered: Vec<usize> = if needle.is_empty() {
            (0..self.rows.len()).collect()
        } else {
            self.rows
                .iter()
                .enumerate()
                .filter(|(_, row)| {
                    row.fields()
                        .iter()
                        .any(|(_, value)| value.contains_lowercase(&needle))
                })
                .map(|(i, _)| i)
                .collect()
        };

        if let Some(field) = self.state.sort_field {
            let keys: Vec<FieldValue> = self.rows.iter().map(|row| row.field(field)).collect();
            let direction = self.state.sort_direction;
            // `sort_by` is stable; reversing the comparison keeps ties in input order.
            ordered.sort_by(|&a, &b| {
                let ord = keys[a].compare(&keys[b]);
                match direction {
                    SortDirection::Ascending => ord,
                    SortDirection::Descending => ord.reverse(),
                }
            });
        }

        self.ordered = ordered;
        self.state.current_page = self.state.current_page.clamp(1, self.total_pages());
    }
}
