//! Response compression layer.

use tower_http::compression::CompressionLayer;

/// Gzip compression for JSON bodies such as large client lists and reports.
pub fn build_compression_layer() -> CompressionLayer {
    CompressionLayer::new()
}
