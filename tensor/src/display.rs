use crate::{Tensor, TensorData};
use std::fmt;

impl fmt::Display for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.data();
        match self.shape() {
            [] => {
                writeln!(f, "<>")?;
                write_matrix(f, data, 0, (1, 1))
            }
            &[len] => {
                writeln!(f, "<{len}>")?;
                write_matrix(f, data, 0, (len, 1))
            }
            &[rows, cols] => {
                writeln!(f, "<{rows}x{cols}>")?;
                write_matrix(f, data, 0, (rows, cols))
            }
            [batch @ .., rows, cols] => {
                let (rows, cols) = (*rows, *cols);
                let mut strides = vec![1usize; batch.len()];
                for i in (1..batch.len()).rev() {
                    strides[i - 1] = strides[i] * batch[i];
                }
                for i in 0..batch[0] * strides[0] {
                    let mut which = Vec::with_capacity(strides.len());
                    let mut rem = i;
                    for &stride in &strides {
                        which.push((rem / stride).to_string());
                        rem %= stride;
                    }
                    writeln!(f, "<{rows}x{cols}>[{}]", which.join(", "))?;
                    write_matrix(f, data, i * rows * cols, (rows, cols))?;
                }
                Ok(())
            }
        }
    }
}

fn write_matrix(
    f: &mut fmt::Formatter<'_>,
    data: &TensorData,
    start: usize,
    (rows, cols): (usize, usize),
) -> fmt::Result {
    for r in 0..rows {
        for c in 0..cols {
            write_element(f, data, start + r * cols + c)?;
            write!(f, " ")?;
        }
        writeln!(f)?;
    }
    Ok(())
}

fn write_element(f: &mut fmt::Formatter<'_>, data: &TensorData, i: usize) -> fmt::Result {
    match data {
        TensorData::Int32(v) => write!(f, "{}", v[i]),
        TensorData::Int64(v) => write!(f, "{}", v[i]),
        TensorData::Float32(v) => write!(f, "{:.3e}", v[i]),
        TensorData::Float64(v) => write!(f, "{:.3e}", v[i]),
        TensorData::String(v) => write!(f, "{:?}", v[i]),
        TensorData::Bool(v) => write!(f, "{}", v[i]),
        TensorData::Complex128(v) => write!(f, "{:.3e}{:+.3e}i", v[i].re, v[i].im),
    }
}

#[test]
fn test_display() {
    let tensor = Tensor::new([[1, 2, 3], [4, 5, 6]], None).unwrap();
    assert_eq!(tensor.to_string(), "<2x3>\n1 2 3 \n4 5 6 \n");

    let tensor = Tensor::new(7, None).unwrap();
    assert_eq!(tensor.to_string(), "<>\n7 \n");

    let tensor = Tensor::new([[[1, 2]], [[3, 4]]], None).unwrap();
    assert_eq!(
        tensor.to_string(),
        "<1x2>[0]\n1 2 \n<1x2>[1]\n3 4 \n"
    );
}
