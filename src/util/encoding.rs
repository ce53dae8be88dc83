use anyhow::{Context, Result, anyhow};
use encoding::DecoderTrap;
use encoding::label::encoding_from_whatwg_label;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// read to end and decode a plain-text upload to utf-8
pub fn decode_to_utf8<R>(input: &mut R) -> Result<String>
where
    R: std::io::Read,
{
    let mut buf: Vec<u8> = Vec::new();
    input
        .read_to_end(&mut buf)
        .context("Could not read text upload")?;

    decode_to_utf8_raw(&buf)
}

/// Valid utf-8 (with or without BOM) is taken as is; anything else goes through
/// charset detection and is decoded ignoring unknown characters.
/// ref. https://github.com/thuleqaid/rust-chardet
pub fn decode_to_utf8_raw(input: &[u8]) -> Result<String> {
    let input = input.strip_prefix(UTF8_BOM).unwrap_or(input);
    if let Ok(text) = std::str::from_utf8(input) {
        return Ok(text.to_string());
    }

    // result.0 Encode, result.1 Confidence, result.2 Language
    let result = chardet::detect(input);
    tracing::debug!(
        "detected charset {} (confidence {:.2}) for text upload",
        result.0,
        result.1
    );

    let coder = encoding_from_whatwg_label(chardet::charset2encoding(&result.0));
    if let Some(c) = coder {
        c.decode(input, DecoderTrap::Ignore)
            .map_err(|e| anyhow!("Error:{:?}", e))
    } else {
        Err(anyhow!("cannot find character encodings: {:?}", &result))
    }
}
