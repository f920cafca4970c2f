#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChunk {
    pub index: usize,
    pub text: String,
    pub token_count: usize,
}

impl TextChunk {
    pub fn new(index: usize, text: String, token_count: usize) -> Self {
        Self {
            index,
            text,
            token_count,
        }
    }
}
