pub mod binomial;
pub mod bs_analytic;
