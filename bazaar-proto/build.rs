fn main() {
    tonic_prost_build::configure()
        .compile_protos(
            &[
                "proto/users.proto",
                "proto/products.proto",
                "proto/health.proto",
            ],
            &["proto"],
        )
        .unwrap();
}
