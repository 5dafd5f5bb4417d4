use super::remote_write_models::WriteRequest;
use crate::error::TransmissionError;
use prost::Message;
use snap::raw::Encoder;

/// Serializes and compresses a request into a remote write body.
///
/// The body uses the Snappy block format. The framed format is not
/// understood by remote write receivers.
pub fn encode_write_request(request: &WriteRequest) -> Result<Vec<u8>, TransmissionError> {
    let data = request.encode_to_vec();
    Encoder::new()
        .compress_vec(&data)
        .map_err(|err| TransmissionError::Encode(err.to_string()))
}
