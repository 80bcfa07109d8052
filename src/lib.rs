pub mod configuration;

pub mod manager {
    pub mod managererror;
    pub mod manager;
}

pub mod math {
    pub mod curve {
        pub mod curve;
        pub mod nonparametriccurve {
            pub mod nonparametriccurve;
            pub mod piecewisepolynomial;
        }
    }
}

pub mod quantity {
    pub mod quantityerror;
    pub mod samples;
    pub mod quantity;
    pub mod arithmetic;
}
