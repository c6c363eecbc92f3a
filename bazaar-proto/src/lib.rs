//! Bazaar Proto - gRPC 接口定义
//!
//! 由 build.rs 在编译期通过 tonic-prost-build 生成各服务的消息与桩代码

pub mod users {
    include!(concat!(env!("OUT_DIR"), "/bazaar.users.rs"));
}

pub mod products {
    include!(concat!(env!("OUT_DIR"), "/bazaar.products.rs"));
}

pub mod health {
    include!(concat!(env!("OUT_DIR"), "/grpc.health.v1.rs"));
}
