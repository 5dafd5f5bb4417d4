use super::remote_write_models::WriteRequest;
use anyhow::Result;
use prost::Message;
use snap::raw::Decoder;
use std::io::Cursor;

fn decompress_snappy(input: &[u8]) -> Result<Vec<u8>> {
    // Block format only, same as the encoder.
    Ok(Decoder::new().decompress_vec(input)?)
}

fn parse_protobuf(input: &[u8]) -> Result<WriteRequest> {
    Ok(WriteRequest::decode(&mut Cursor::new(input))?)
}

/// Decodes a remote write body. Used to inspect what was sent.
pub fn parse_remote_write_request(input: &[u8]) -> Result<WriteRequest> {
    let decompressed = decompress_snappy(input)?;
    parse_protobuf(&decompressed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_framed_snappy() {
        let mut framed = Vec::new();
        {
            use std::io::Write;
            let mut writer = snap::write::FrameEncoder::new(&mut framed);
            writer
                .write_all(&WriteRequest::default().encode_to_vec())
                .unwrap();
        }
        assert!(parse_remote_write_request(&framed).is_err());
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(parse_remote_write_request(b"not snappy at all").is_err());
    }
}
