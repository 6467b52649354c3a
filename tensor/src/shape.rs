use crate::{Literal, ShapeError};

/// Recovers the dimension sizes of a rectangular nested literal, outer to inner.
///
/// A scalar has the empty shape. An empty sequence contributes `[0]`; siblings
/// must agree on their whole sub-shape, so `[[1, 2], [3]]` and
/// `[[1, 2], [3, [4]]]` are both rejected.
pub fn infer_shape(literal: &Literal) -> Result<Vec<usize>, ShapeError> {
    shape_of(literal, &mut Vec::new())
}

fn shape_of(literal: &Literal, path: &mut Vec<usize>) -> Result<Vec<usize>, ShapeError> {
    let Literal::Seq(items) = literal else {
        return Ok(vec![]);
    };

    let mut tail = None::<Vec<usize>>;
    for (i, item) in items.iter().enumerate() {
        path.push(i);
        let sub = shape_of(item, path)?;
        match &tail {
            Some(expected) if *expected != sub => {
                return Err(ShapeError::Irregular {
                    path: path.clone(),
                    expected: expected.clone(),
                    found: sub,
                });
            }
            Some(_) => {}
            None => tail = Some(sub),
        }
        path.pop();
    }

    let mut shape = vec![items.len()];
    shape.extend(tail.unwrap_or_default());
    Ok(shape)
}

/// Row-major strides in elements.
pub fn strides(shape: &[usize]) -> Vec<usize> {
    let mut ans = vec![1; shape.len()];
    for i in (1..shape.len()).rev() {
        ans[i - 1] = ans[i] * shape[i];
    }
    ans
}

/// Flat offset of a 1-based coordinate.
///
/// Accumulates from the innermost axis outward, each axis weighted by the
/// product of the sizes already visited.
pub fn offset(shape: &[usize], index: &[usize]) -> Result<usize, ShapeError> {
    if index.len() != shape.len() {
        return Err(ShapeError::IndexArity {
            rank: shape.len(),
            found: index.len(),
        });
    }
    for (axis, (&value, &size)) in index.iter().zip(shape).enumerate() {
        if value < 1 || value > size {
            return Err(ShapeError::IndexOutOfRange { axis, value, size });
        }
    }

    let mut sum = 0;
    let mut prod = 1;
    for (&value, &size) in index.iter().zip(shape).rev() {
        sum += (value - 1) * prod;
        prod *= size;
    }
    Ok(sum)
}

#[inline]
pub fn num_elements(shape: &[usize]) -> usize {
    shape.iter().product()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_infer() {
        assert_eq!(infer_shape(&Literal::from(7)), Ok(vec![]));
        assert_eq!(infer_shape(&Literal::from([1, 2, 3])), Ok(vec![3]));
        assert_eq!(
            infer_shape(&Literal::from(vec![
                vec![vec![2, 3, 4], vec![2, 3, 4], vec![2, 3, 4]],
                vec![vec![2, 3, 4], vec![2, 3, 4], vec![2, 3, 4]],
            ])),
            Ok(vec![2, 3, 3])
        );
    }

    #[test]
    fn test_empty() {
        assert_eq!(infer_shape(&Literal::Seq(vec![])), Ok(vec![0]));
        let nested = Literal::seq([Literal::Seq(vec![]), Literal::Seq(vec![])]);
        assert_eq!(infer_shape(&nested), Ok(vec![2, 0]));
        let ragged = Literal::seq([Literal::Seq(vec![]), Literal::from([1])]);
        assert!(infer_shape(&ragged).is_err());
    }

    #[test]
    fn test_irregular() {
        let literal = Literal::from(vec![vec![1, 2], vec![3]]);
        assert_eq!(
            infer_shape(&literal),
            Err(ShapeError::Irregular {
                path: vec![1],
                expected: vec![2],
                found: vec![1],
            })
        );

        let mixed_depth = Literal::seq([
            Literal::from([1, 2]),
            Literal::seq([Literal::from(3), Literal::from([4])]),
        ]);
        assert!(matches!(
            infer_shape(&mixed_depth),
            Err(ShapeError::Irregular { .. })
        ));
    }

    #[test]
    fn test_offset() {
        let shape = [2, 2];
        assert_eq!(offset(&shape, &[1, 1]), Ok(0));
        assert_eq!(offset(&shape, &[1, 2]), Ok(1));
        assert_eq!(offset(&shape, &[2, 1]), Ok(2));
        assert_eq!(offset(&shape, &[2, 2]), Ok(3));

        let shape = [2, 3, 4];
        let strides = strides(&shape);
        assert_eq!(strides, [12, 4, 1]);
        let mut expected = 0;
        for i in 1..=2 {
            for j in 1..=3 {
                for k in 1..=4 {
                    assert_eq!(offset(&shape, &[i, j, k]), Ok(expected));
                    let by_strides = (i - 1) * strides[0] + (j - 1) * strides[1] + (k - 1);
                    assert_eq!(by_strides, expected);
                    expected += 1;
                }
            }
        }

        assert_eq!(offset(&[], &[]), Ok(0));
    }

    #[test]
    fn test_offset_invalid() {
        let shape = [2, 3];
        assert_eq!(
            offset(&shape, &[1]),
            Err(ShapeError::IndexArity { rank: 2, found: 1 })
        );
        assert_eq!(
            offset(&shape, &[0, 1]),
            Err(ShapeError::IndexOutOfRange {
                axis: 0,
                value: 0,
                size: 2,
            })
        );
        assert_eq!(
            offset(&shape, &[2, 4]),
            Err(ShapeError::IndexOutOfRange {
                axis: 1,
                value: 4,
                size: 3,
            })
        );
    }
}
