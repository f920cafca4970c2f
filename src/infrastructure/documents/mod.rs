mod docx_renderer;
mod graph_client;

pub use docx_renderer::DocxRenderer;
pub use graph_client::GraphClient;
