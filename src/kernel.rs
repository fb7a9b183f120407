//! Tables of convolution coefficients.
use crate::KernelError;

/// Radius of the default Gaussian kernel.
pub const DEFAULT_RADIUS: u32 = 16;
/// Standard deviation of the default Gaussian kernel.
pub const DEFAULT_SIGMA: f64 = 10.;

/// Odd-length 1D table of convolution coefficients.
///
/// Coefficients are computed once on the host side with double precision
/// and handed to the convolution kernels as a read-only `f32` constant.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    radius: u32,
    sigma: Option<f64>,
    values: Vec<f64>,
}

impl Kernel {
    /// Creates normalized Gaussian kernel with `2 * radius + 1` coefficients.
    ///
    /// `w[i] = G(i - radius; sigma) / sum(G(j - radius; sigma))`
    ///
    /// Kernel with zero radius is an identity kernel, `sigma` is
    /// ignored in this case.
    pub fn gaussian(radius: u32, sigma: f64) -> Result<Self, KernelError> {
        if radius == 0 {
            return Ok(Self {
                radius,
                sigma: Some(sigma),
                values: vec![1.],
            });
        }
        if !sigma.is_finite() || sigma <= 0. {
            return Err(KernelError::InvalidSigma(sigma));
        }

        let size = 2 * radius as usize + 1;
        let two_sigma_sq = 2. * sigma * sigma;
        let mut values: Vec<f64> = (0..size)
            .map(|i| {
                let x = i as f64 - radius as f64;
                (-x * x / two_sigma_sq).exp()
            })
            .collect();

        // The center coefficient is exp(0) = 1, so the sum is never zero.
        let sum: f64 = values.iter().sum();
        values.iter_mut().for_each(|w| *w /= sum);

        // Make the table exactly symmetric regardless of rounding in exp().
        let (head, tail) = values.split_at_mut(radius as usize + 1);
        for (dst, &src) in tail.iter_mut().zip(head.iter().rev().skip(1)) {
            *dst = src;
        }

        Ok(Self {
            radius,
            sigma: Some(sigma),
            values,
        })
    }

    /// Kernel with single coefficient equal to `1.0`.
    pub fn identity() -> Self {
        Self {
            radius: 0,
            sigma: None,
            values: vec![1.],
        }
    }

    /// Creates kernel from the given coefficients without normalization.
    pub fn from_values(values: Vec<f64>) -> Result<Self, KernelError> {
        if values.len() % 2 == 0 {
            return Err(KernelError::EvenLength(values.len()));
        }
        Ok(Self {
            radius: (values.len() / 2) as u32,
            sigma: None,
            values,
        })
    }

    #[inline(always)]
    pub fn radius(&self) -> u32 {
        self.radius
    }

    /// Standard deviation of a Gaussian kernel.
    #[inline(always)]
    pub fn sigma(&self) -> Option<f64> {
        self.sigma
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline(always)]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Returns coefficients in the form used by convolution kernels.
    pub fn weights(&self) -> Vec<f32> {
        self.values.iter().map(|&v| v as f32).collect()
    }
}

impl Default for Kernel {
    fn default() -> Self {
        // Arguments are valid constants.
        match Self::gaussian(DEFAULT_RADIUS, DEFAULT_SIGMA) {
            Ok(kernel) => kernel,
            Err(_) => unreachable!(),
        }
    }
}

/// Square table of `N x N` coefficients of 2D convolution, stored by rows.
///
/// Row index selects vertical offset of tap, column index selects
/// horizontal one.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel2d {
    radius: u32,
    values: Vec<f64>,
}

impl Kernel2d {
    /// Creates 2D kernel as the outer product of 1D kernel with itself.
    pub fn outer(kernel: &Kernel) -> Self {
        let values = kernel
            .values()
            .iter()
            .flat_map(|&wy| kernel.values().iter().map(move |&wx| wy * wx))
            .collect();
        Self {
            radius: kernel.radius(),
            values,
        }
    }

    pub fn from_values(radius: u32, values: Vec<f64>) -> Result<Self, KernelError> {
        let size = 2 * radius as usize + 1;
        let expected = size * size;
        if values.len() != expected {
            return Err(KernelError::InvalidSize {
                expected,
                actual: values.len(),
            });
        }
        Ok(Self { radius, values })
    }

    #[inline(always)]
    pub fn radius(&self) -> u32 {
        self.radius
    }

    /// Count of coefficients in one row.
    #[inline(always)]
    pub fn size(&self) -> usize {
        2 * self.radius as usize + 1
    }

    #[inline(always)]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn weights(&self) -> Vec<f32> {
        self.values.iter().map(|&v| v as f32).collect()
    }
}
