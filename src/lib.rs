pub mod shared {
    pub mod core {
        pub mod primitives;
    }
    pub mod infrastructure {
        pub mod task_channel;
    }
}

pub mod modules {
    pub mod transactions {
        pub mod core {
            pub mod errors;
            pub mod status;
            pub mod transaction;
            pub mod transitions;
        }
        pub mod use_cases {
            pub mod create_transaction {
                pub mod command;
                pub mod decide;
                pub mod decision;
                pub mod handler;
                pub mod inbound {
                    pub mod http;
                    pub mod task;
                }
            }
            pub mod query_transactions {
                pub mod handler;
                pub mod inbound {
                    pub mod http;
                }
            }
            pub mod delete_transaction {
                pub mod handler;
                pub mod inbound {
                    pub mod http;
                }
            }
            pub mod update_transaction_status {
                pub mod command;
                pub mod decide;
                pub mod decision;
                pub mod handler;
                pub mod inbound {
                    pub mod http;
                }
            }
        }
        pub mod adapters {
            pub mod inbound {
                pub mod envelope;
            }
            pub mod outbound {
                pub mod task_dispatch;
                pub mod transaction_store;
                pub mod transaction_store_in_memory;
                #[cfg(feature = "storage-postgres")]
                pub mod transaction_store_postgres;
            }
        }
    }
}

pub mod shell;
