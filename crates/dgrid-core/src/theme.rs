//! Layout-relevant theme values.
//!
//! Colors and other paint-only settings live with the renderer; this struct
//! carries only what the metrics engine and resize interaction consume.
//! Immutable per layout pass.

/// A font described as a CSS font string, e.g. `"12px Arial, sans serif"`.
pub type GridFont = String;

#[derive(Debug, Clone, PartialEq)]
pub struct GridTheme {
    /// Allow column/row resizing.
    pub allow_column_resize: bool,
    pub allow_row_resize: bool,

    /// Automatically size columns/rows to fit contents.
    pub auto_size_columns: bool,
    pub auto_size_rows: bool,

    /// Padding within a cell and header, applied on both sides.
    pub cell_horizontal_padding: f64,
    pub header_horizontal_padding: f64,

    /// Fonts for cell data and column headers.
    pub font: GridFont,
    pub header_font: GridFont,

    /// Pixel size of the grab handle drawn over a header separator.
    pub header_separator_handle_size: f64,

    /// Scroll bar sizing.
    pub min_scroll_handle_size: f64,
    pub scroll_bar_size: f64,

    /// Tree table metrics.
    pub tree_depth_indent: f64,
    pub tree_horizontal_padding: f64,

    /// Default row height/column width.
    pub row_height: f64,
    pub column_width: f64,
    pub min_row_height: f64,
    pub min_column_width: f64,

    /// Default header/footer thicknesses.
    pub column_header_height: f64,
    pub row_header_width: f64,
    pub row_footer_width: f64,

    /// When resizing a header, snap to the auto size within this distance.
    pub header_resize_snap_threshold: f64,
    /// When resizing a header, snap to hidden (zero) within this distance.
    pub header_resize_hidden_snap_threshold: f64,
}

impl Default for GridTheme {
    fn default() -> Self {
        Self {
            allow_column_resize: true,
            allow_row_resize: true,
            auto_size_columns: true,
            auto_size_rows: true,
            cell_horizontal_padding: 5.0,
            header_horizontal_padding: 5.0,
            font: "12px Arial, sans serif".to_string(),
            header_font: "10px Arial, sans serif".to_string(),
            header_separator_handle_size: 5.0,
            min_scroll_handle_size: 50.0,
            scroll_bar_size: 12.0,
            tree_depth_indent: 10.0,
            tree_horizontal_padding: 5.0,
            row_height: 20.0,
            column_width: 100.0,
            min_row_height: 20.0,
            min_column_width: 55.0,
            column_header_height: 20.0,
            row_header_width: 30.0,
            row_footer_width: 0.0,
            header_resize_snap_threshold: 10.0,
            header_resize_hidden_snap_threshold: 8.0,
        }
    }
}
