use crate::{Tensor, TensorData};

impl Tensor {
    /// Size of the contiguous buffer returned by [`Tensor::to_native_bytes`].
    pub fn byte_len(&self) -> usize {
        match self.data() {
            TensorData::String(v) => v
                .iter()
                .map(|s| size_of::<u64>() + varint_len(s.len() as u64) + s.len())
                .sum(),
            data => data.len() * self.element_size(),
        }
    }

    /// Little-endian row-major buffer in the runtime's tensor layout.
    ///
    /// Strings are laid out as a table of `u64` offsets into the data section,
    /// followed by each string as a varint length and its bytes.
    pub fn to_native_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.byte_len());
        match self.data() {
            TensorData::Int32(v) => v.iter().for_each(|x| buf.extend(x.to_le_bytes())),
            TensorData::Int64(v) => v.iter().for_each(|x| buf.extend(x.to_le_bytes())),
            TensorData::Float32(v) => v.iter().for_each(|x| buf.extend(x.to_le_bytes())),
            TensorData::Float64(v) => v.iter().for_each(|x| buf.extend(x.to_le_bytes())),
            TensorData::Bool(v) => buf.extend(v.iter().map(|&b| b as u8)),
            TensorData::Complex128(v) => v.iter().for_each(|c| {
                buf.extend(c.re.to_le_bytes());
                buf.extend(c.im.to_le_bytes())
            }),
            TensorData::String(v) => {
                let mut offset = 0u64;
                for s in v {
                    buf.extend(offset.to_le_bytes());
                    offset += (varint_len(s.len() as u64) + s.len()) as u64;
                }
                for s in v {
                    write_varint(&mut buf, s.len() as u64);
                    buf.extend(s.as_bytes())
                }
            }
        }
        buf
    }
}

fn varint_len(mut value: u64) -> usize {
    let mut len = 1;
    while value >= 0x80 {
        value >>= 7;
        len += 1
    }
    len
}

fn write_varint(buf: &mut Vec<u8>, mut value: u64) {
    while value >= 0x80 {
        buf.push((value as u8 & 0x7f) | 0x80);
        value >>= 7
    }
    buf.push(value as u8)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{DataType, Literal};

    #[test]
    fn test_fixed_width() {
        let tensor = Tensor::new([[1, 2], [3, 4]], Some(DataType::Int32)).unwrap();
        let bytes = tensor.to_native_bytes();
        assert_eq!(bytes.len(), tensor.byte_len());
        assert_eq!(bytes, [1, 0, 0, 0, 2, 0, 0, 0, 3, 0, 0, 0, 4, 0, 0, 0]);

        let tensor = Tensor::new([true, false], None).unwrap();
        assert_eq!(tensor.to_native_bytes(), [1, 0]);

        let tensor = Tensor::new(Literal::complex(1., -2.), None).unwrap();
        let bytes = tensor.to_native_bytes();
        assert_eq!(bytes.len(), 16);
        assert_eq!(bytes[..8], 1f64.to_le_bytes());
        assert_eq!(bytes[8..], (-2f64).to_le_bytes());
    }

    #[test]
    fn test_strings() {
        let long = "x".repeat(200);
        let tensor = Tensor::new(vec!["ab", long.as_str()], None).unwrap();
        let bytes = tensor.to_native_bytes();
        assert_eq!(bytes.len(), tensor.byte_len());
        assert_eq!(bytes[..8], 0u64.to_le_bytes());
        assert_eq!(bytes[8..16], 3u64.to_le_bytes());
        assert_eq!(bytes[16..19], [2, b'a', b'b']);
        // 200 needs two varint bytes
        assert_eq!(bytes[19..21], [0xc8, 0x01]);
        assert_eq!(bytes.len(), 16 + 3 + 2 + 200);
    }

    #[test]
    fn test_varint() {
        for (value, len) in [(0, 1), (0x7f, 1), (0x80, 2), (16_383, 2), (16_384, 3)] {
            let mut buf = Vec::new();
            write_varint(&mut buf, value);
            assert_eq!(buf.len(), len);
            assert_eq!(varint_len(value), len);
        }
    }
}
