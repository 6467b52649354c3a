use num_complex::Complex64;
use std::fmt;

/// 原生嵌套字面量
#[derive(Clone, PartialEq, Debug)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    Complex(Complex64),
    Seq(Vec<Literal>),
}

/// Basic kind of a literal.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Kind {
    Int,
    Float,
    Str,
    Bool,
    Complex,
    Seq,
}

impl Kind {
    #[inline]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Int | Self::Float)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Int => "integer",
            Self::Float => "real",
            Self::Str => "text",
            Self::Bool => "boolean",
            Self::Complex => "complex",
            Self::Seq => "sequence",
        })
    }
}

impl Literal {
    pub fn seq(items: impl IntoIterator<Item = impl Into<Literal>>) -> Self {
        Self::Seq(items.into_iter().map(Into::into).collect())
    }

    pub fn complex(re: f64, im: f64) -> Self {
        Self::Complex(Complex64::new(re, im))
    }

    pub fn kind(&self) -> Kind {
        match self {
            Self::Int(_) => Kind::Int,
            Self::Float(_) => Kind::Float,
            Self::Str(_) => Kind::Str,
            Self::Bool(_) => Kind::Bool,
            Self::Complex(_) => Kind::Complex,
            Self::Seq(_) => Kind::Seq,
        }
    }

    #[inline]
    pub fn is_seq(&self) -> bool {
        matches!(self, Self::Seq(_))
    }

    /// Scalars in depth-first, left-to-right order.
    pub fn leaves(&self) -> Vec<&Literal> {
        fn walk<'a>(literal: &'a Literal, out: &mut Vec<&'a Literal>) {
            match literal {
                Literal::Seq(items) => items.iter().for_each(|item| walk(item, out)),
                scalar => out.push(scalar),
            }
        }

        let mut ans = Vec::new();
        walk(self, &mut ans);
        ans
    }
}

macro_rules! impl_from {
    ($variant:ident: $($ty:ty),+) => {
        $(
            impl From<$ty> for Literal {
                #[inline]
                fn from(value: $ty) -> Self {
                    Self::$variant(value.into())
                }
            }
        )+
    };
}

impl_from!(Int: i8, i16, i32, i64, u8, u16, u32);
impl_from!(Float: f32, f64);
impl_from!(Str: &str, String);
impl_from!(Bool: bool);
impl_from!(Complex: Complex64);

impl<T: Into<Literal>> From<Vec<T>> for Literal {
    fn from(value: Vec<T>) -> Self {
        Self::seq(value)
    }
}

impl<T: Into<Literal>, const N: usize> From<[T; N]> for Literal {
    fn from(value: [T; N]) -> Self {
        Self::seq(value)
    }
}

#[test]
fn test_leaves_order() {
    let literal = Literal::from(vec![vec![1, 2], vec![3, 4]]);
    let leaves = literal
        .leaves()
        .into_iter()
        .cloned()
        .collect::<Vec<_>>();
    assert_eq!(leaves, [1, 2, 3, 4].map(Literal::Int));

    let scalar = Literal::from(2.5);
    assert_eq!(scalar.leaves(), [&Literal::Float(2.5)]);
    assert!(Literal::seq(Vec::<i32>::new()).leaves().is_empty());
}

#[test]
fn test_kind() {
    assert_eq!(Literal::from("a").kind(), Kind::Str);
    assert_eq!(Literal::complex(1., -1.).kind(), Kind::Complex);
    assert_eq!(Literal::from([true]).kind(), Kind::Seq);
    assert!(Kind::Int.is_numeric() && !Kind::Complex.is_numeric());
}
