//! Plain-text grid for the terminal display surface.
//!
//! Narrowing and ordering happen here, on the presentation side; the
//! controller only tracks which filter and sort are active.

use std::{cmp::Ordering, fmt::Write as _};

use catalog_core::{format::price_cell, InteractionState, Logger};
use shared::{
    domain::Product,
    protocol::{SortDirection, SortItem},
};

const HEADERS: [&str; 5] = ["ID", "Categories", "Name", "In Stock", "Price"];

pub fn visible_rows<'a>(state: &'a InteractionState) -> Vec<&'a Product> {
    let mut rows: Vec<&Product> = state
        .records
        .iter()
        .filter(|product| {
            state.active_filter_value.is_empty()
                || product.in_category(&state.active_filter_value)
        })
        .collect();

    if let Some(sort) = state.active_sort.items().first() {
        rows.sort_by(|a, b| compare(a, b, sort));
    }
    rows
}

fn compare(a: &Product, b: &Product, sort: &SortItem) -> Ordering {
    let ordering = match sort.field.as_str() {
        "id" => a.id.cmp(&b.id),
        "name" => a.name.cmp(&b.name),
        "categories" => a.categories.cmp(&b.categories),
        "inStock" => a.in_stock.cmp(&b.in_stock),
        "price" => a.price.partial_cmp(&b.price).unwrap_or(Ordering::Equal),
        _ => Ordering::Equal,
    };
    match sort.sort {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

pub fn render_table(state: &InteractionState, logger: &Logger, page_size: usize) -> String {
    let mut out = String::new();
    if let Some(error) = &state.error {
        let _ = writeln!(out, "! {error}");
    }

    let rows = visible_rows(state);
    let cells: Vec<[String; 5]> = rows
        .iter()
        .take(page_size)
        .map(|product| {
            [
                product.id.map(|id| id.0.to_string()).unwrap_or_default(),
                product
                    .categories
                    .as_deref()
                    .map(|categories| categories.join(", "))
                    .unwrap_or_default(),
                product.name.clone().unwrap_or_default(),
                match product.in_stock {
                    Some(true) => "yes".to_string(),
                    Some(false) => "no".to_string(),
                    None => String::new(),
                },
                price_cell(product, logger),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    push_row(&mut out, &HEADERS.map(str::to_string), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "{}", rule.join("-+-"));
    for row in &cells {
        push_row(&mut out, row, &widths);
    }

    let shown = cells.len();
    let _ = writeln!(
        out,
        "{shown} of {} rows shown ({} loaded)",
        rows.len(),
        state.records.len()
    );
    out
}

fn push_row(out: &mut String, row: &[String; 5], widths: &[usize; 5]) {
    let padded: Vec<String> = row
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect();
    let _ = writeln!(out, "{}", padded.join(" | ").trim_end());
}
