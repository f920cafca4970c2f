use std::sync::LazyLock;

use tiktoken_rs::CoreBPE;

use crate::domain::TextChunk;

static TOKENIZER: LazyLock<CoreBPE> = LazyLock::new(|| {
    tiktoken_rs::o200k_base().expect("Failed to initialize o200k_base tokenizer")
});

pub fn count_tokens(text: &str) -> usize {
    TOKENIZER.encode_with_special_tokens(text).len()
}

/// Splits `text` into consecutive windows of at most `max_tokens` tokens, in source order.
///
/// A window prefers to end on a character boundary. When no token inside the window
/// ends on one (a single character spread over more tokens than the window holds), the
/// window keeps its full size and the character is attached to the window it ends in.
/// Concatenating the chunk texts always yields `text`.
pub fn split_by_tokens(text: &str, max_tokens: usize) -> Result<Vec<TextChunk>, ChunkingError> {
    if max_tokens == 0 {
        return Err(ChunkingError::InvalidWindow);
    }
    if text.is_empty() {
        return Ok(Vec::new());
    }

    let tokens = TOKENIZER.encode_with_special_tokens(text);
    let offsets = byte_offsets(&tokens, text.len());
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < tokens.len() {
        let limit = (start + max_tokens).min(tokens.len());
        let end = (start + 1..=limit)
            .rev()
            .find(|&end| text.is_char_boundary(offsets[end]))
            .unwrap_or(limit);

        let from = next_char_boundary(text, offsets[start]);
        let to = next_char_boundary(text, offsets[end]);
        chunks.push(TextChunk::new(
            chunks.len(),
            text[from..to].to_string(),
            end - start,
        ));
        start = end;
    }

    Ok(chunks)
}

/// Byte offset in the source text at which each token starts, plus the end offset.
fn byte_offsets(tokens: &[u32], text_len: usize) -> Vec<usize> {
    let mut offsets = Vec::with_capacity(tokens.len() + 1);
    offsets.push(0);
    let mut position = 0;
    for bytes in TOKENIZER._decode_native_and_split(tokens.to_vec()) {
        position = (position + bytes.len()).min(text_len);
        offsets.push(position);
    }
    offsets
}

fn next_char_boundary(text: &str, mut index: usize) -> usize {
    while !text.is_char_boundary(index) {
        index += 1;
    }
    index
}

#[derive(Debug, thiserror::Error)]
pub enum ChunkingError {
    #[error("max tokens per chunk must be greater than zero")]
    InvalidWindow,
}
