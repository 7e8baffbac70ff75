//! Two-column name/value list fed from any thread.
//!
//! The map lives behind a mutex that is held only while it is read or
//! updated; drawing works on a snapshot.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use kurbo::{Point, Rect};

use crate::color::Color;
use crate::config::TableStyle;
use crate::painter::{Align, Painter, Pen};

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub name: String,
    pub value: String,
    pub name_color: Color,
    pub value_color: Color,
    pub background: Color,
}

/// Cloning yields another handle onto the same list.
#[derive(Debug, Clone, Default)]
pub struct KeyValueList {
    data: Arc<Mutex<BTreeMap<String, String>>>,
    dirty: Arc<AtomicBool>,
    style: Arc<TableStyle>,
}

impl KeyValueList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_style(style: TableStyle) -> Self {
        Self {
            style: Arc::new(style),
            ..Self::default()
        }
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn insert(&self, key: impl Into<String>, value: impl Into<String>) {
        self.lock().insert(key.into(), value.into());
        self.dirty.store(true, Ordering::Release);
    }

    pub fn remove(&self, key: &str) -> Option<String> {
        let removed = self.lock().remove(key);
        if removed.is_some() {
            self.dirty.store(true, Ordering::Release);
        }
        removed
    }

    /// Swap in a whole new data set.
    pub fn replace(&self, data: BTreeMap<String, String>) {
        *self.lock() = data;
        self.dirty.store(true, Ordering::Release);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }

    /// Consume the "list changed" flag.
    pub fn take_dirty(&self) -> bool {
        self.dirty.swap(false, Ordering::AcqRel)
    }

    /// Styled rows in key order, alternating background per row.
    pub fn rows(&self) -> Vec<Row> {
        let snapshot: Vec<(String, String)> = self
            .lock()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        snapshot
            .into_iter()
            .enumerate()
            .map(|(i, (name, value))| Row {
                name,
                value,
                name_color: self.style.name_color,
                value_color: self.style.value_color,
                background: if i % 2 == 0 {
                    self.style.even_background
                } else {
                    self.style.odd_background
                },
            })
            .collect()
    }

    /// Draw the header and as many rows as fit in `width` x `height`.
    pub fn render<P: Painter + ?Sized>(&self, painter: &mut P, width: f64, height: f64) {
        let style = &*self.style;
        let rows = self.rows();
        let row_height = style.row_height;
        let split = style.name_column_width.min(width);

        let cells = |painter: &mut P, top: f64, name: &str, value: &str, colors: (Color, Color)| {
            painter.text(
                Rect::new(4.0, top, split - 2.0, top + row_height),
                Align::Left,
                name,
                style.font_size,
                colors.0,
            );
            painter.text(
                Rect::new(split + 4.0, top, width - 2.0, top + row_height),
                Align::Left,
                value,
                style.font_size,
                colors.1,
            );
        };

        painter.fill_rect(Rect::new(0.0, 0.0, width, row_height), style.header_background);
        cells(
            painter,
            0.0,
            "Name",
            "Value",
            (style.header_color, style.header_color),
        );

        let mut top = row_height;
        for row in &rows {
            if top + row_height > height {
                break;
            }
            painter.fill_rect(Rect::new(0.0, top, width, top + row_height), row.background);
            cells(
                painter,
                top,
                &row.name,
                &row.value,
                (row.name_color, row.value_color),
            );
            top += row_height;
        }

        painter.line(
            Point::new(split, 0.0),
            Point::new(split, top),
            Pen::new(style.odd_background, 1.0),
        );
    }
}
