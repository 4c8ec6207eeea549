pub mod configuration;

pub mod math {
    pub mod integration {
        pub mod integrand;
        pub mod integrationerror;
        pub mod quadraturerule;
        pub mod centralrectangle;
        pub mod trapezoidal;
        pub mod simpson;
        pub mod aprioristepsizer;
        pub mod convergencestate;
        pub mod rungeintegrator;

        mod proptests;
    }
}
