mod composite_file_loader;
mod placeholder_adapter;
mod plain_text_adapter;

pub use composite_file_loader::CompositeFileLoader;
pub use placeholder_adapter::PlaceholderAdapter;
pub use plain_text_adapter::PlainTextAdapter;
