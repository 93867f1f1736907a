use crate::engine::errors::CodecError;
use bytes::Buf;

fn ensure(input: &[u8], needed: usize, column: &str) -> Result<(), CodecError> {
    if input.remaining() < needed {
        return Err(CodecError::UnexpectedEof {
            column: column.to_string(),
            needed,
            remaining: input.remaining(),
        });
    }
    Ok(())
}

pub(crate) fn read_i32(input: &mut &[u8], column: &str) -> Result<i32, CodecError> {
    ensure(*input, 4, column)?;
    Ok(input.get_i32())
}

pub(crate) fn read_u32(input: &mut &[u8], column: &str) -> Result<u32, CodecError> {
    ensure(*input, 4, column)?;
    Ok(input.get_u32())
}

/// Reads a non-negative int32 count or width field.
pub(crate) fn read_count(input: &mut &[u8], column: &str) -> Result<usize, CodecError> {
    let value = read_i32(input, column)?;
    usize::try_from(value).map_err(|_| CodecError::Parsing {
        column: column.to_string(),
        message: format!("negative length field {}", value),
    })
}

pub(crate) fn read_slice<'a>(
    input: &mut &'a [u8],
    len: usize,
    column: &str,
) -> Result<&'a [u8], CodecError> {
    ensure(*input, len, column)?;
    let slice: &'a [u8] = *input;
    let (head, tail) = slice.split_at(len);
    *input = tail;
    Ok(head)
}

pub(crate) fn write_count<W: std::io::Write>(
    sink: &mut W,
    count: usize,
    column: &str,
) -> Result<(), CodecError> {
    let value = i32::try_from(count).map_err(|_| CodecError::Parsing {
        column: column.to_string(),
        message: format!("{} elements exceed the int32 count field", count),
    })?;
    sink.write_all(&value.to_be_bytes())?;
    Ok(())
}
