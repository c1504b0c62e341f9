//! Moving dimension levels between the row and column axes.

use indexmap::IndexMap;
use std::collections::HashMap;
use tracing::debug;

use crate::error::TransformResult;
use crate::model::{Index, ResultTable, Scalar};

/// Move the named row levels into the column axis, then optionally swap the
/// axes.
///
/// Pivoted levels become the outer column levels, in the order given, above
/// the existing column levels. Remaining row levels keep their order and rows
/// keep first-appearance order. Keys that name no row level are ignored.
pub fn pivot_table(
    table: &ResultTable,
    pivot_keys: &[String],
    transpose: bool,
) -> TransformResult<ResultTable> {
    let mut positions = Vec::with_capacity(pivot_keys.len());
    for key in pivot_keys {
        match table.index().position_of(key) {
            Some(pos) if !positions.contains(&pos) => positions.push(pos),
            Some(_) => {}
            None => debug!(pivot_key = %key, "pivot key is not a row level, ignoring"),
        }
    }

    let pivoted = if positions.is_empty() {
        table.clone()
    } else {
        unstack(table, &positions)?
    };

    Ok(if transpose {
        pivoted.transpose()
    } else {
        pivoted
    })
}

/// Move the row levels at `positions` into the column axis.
fn unstack(table: &ResultTable, positions: &[usize]) -> TransformResult<ResultTable> {
    let index = table.index();
    let remaining: Vec<usize> = (0..index.nlevels())
        .filter(|p| !positions.contains(p))
        .collect();

    // New rows are the distinct remaining-level tuples, new column groups the
    // distinct pivoted-level tuples, both in first-appearance order.
    let mut row_keys: IndexMap<Vec<Scalar>, usize> = IndexMap::new();
    let mut pivot_keys: IndexMap<Vec<Scalar>, usize> = IndexMap::new();
    let mut cells: HashMap<(usize, usize), usize> = HashMap::new();

    for (source_row, entry) in index.entries().iter().enumerate() {
        let next_row = row_keys.len();
        let row = *row_keys.entry(pick(entry, &remaining)).or_insert(next_row);
        let next_group = pivot_keys.len();
        let group = *pivot_keys.entry(pick(entry, positions)).or_insert(next_group);
        cells.entry((row, group)).or_insert(source_row);
    }

    let columns = table.columns();
    let mut column_levels: Vec<_> = positions.iter().map(|&p| index.levels()[p].clone()).collect();
    column_levels.extend(columns.levels().iter().cloned());

    let column_entries = pivot_keys
        .keys()
        .flat_map(|group| {
            columns.entries().iter().map(move |c| {
                let mut entry = group.clone();
                entry.extend(c.iter().cloned());
                entry
            })
        })
        .collect();
    let new_columns = Index::new(column_levels, column_entries)?;

    let width = columns.len();
    let rows: Vec<Vec<Scalar>> = (0..row_keys.len())
        .map(|row| {
            (0..pivot_keys.len())
                .flat_map(|group| match cells.get(&(row, group)) {
                    Some(&source) => table.rows()[source].clone(),
                    None => vec![Scalar::Null; width],
                })
                .collect::<Vec<_>>()
        })
        .collect();

    let new_index = if remaining.is_empty() {
        Index::range(row_keys.len())
    } else {
        let levels = remaining.iter().map(|&p| index.levels()[p].clone()).collect();
        Index::new(levels, row_keys.into_keys().collect())?
    };

    debug!(
        rows = new_index.len(),
        columns = new_columns.len(),
        "unstacked {} row level(s)",
        positions.len()
    );
    ResultTable::new(new_index, new_columns, rows)
}

fn pick(entry: &[Scalar], at: &[usize]) -> Vec<Scalar> {
    at.iter().map(|&p| entry[p].clone()).collect()
}

/// Drop the metrics level from the column axis when it holds a single key and
/// other levels remain. Returns the dropped key.
pub fn collapse_single_metric(table: &mut ResultTable) -> Option<String> {
    let columns = table.columns();
    if !columns.is_multi() {
        return None;
    }
    let pos = columns.metrics_position()?;
    let keys = columns.unique_values(pos);
    if keys.len() != 1 {
        return None;
    }

    let collapsed = columns.drop_level(pos);
    *table.columns_mut() = collapsed;
    Some(keys[0].to_string())
}
