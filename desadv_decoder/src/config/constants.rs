pub mod compile_time {
    pub mod file_processing {
        /// Maximum interchange file size allowed for processing (10MB)
        /// SECURITY: Prevents DoS via oversized inbox files
        pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

        /// Threshold for considering an interchange file "large" (1MB)
        /// PERFORMANCE: Affects logging verbosity only
        pub const LARGE_FILE_THRESHOLD: u64 = 1024 * 1024;

        /// Maximum record count accepted per interchange file
        /// SECURITY: Prevents algorithmic complexity attacks
        pub const MAX_RECORD_COUNT: usize = 100_000;
    }

    pub mod tokenize {
        /// Maximum segments per document
        /// SECURITY: Prevents DoS via segment explosion
        pub const MAX_SEGMENT_COUNT: usize = 100_000;

        /// Maximum elements per segment
        /// SECURITY: Prevents memory exhaustion via element explosion
        pub const MAX_ELEMENT_COUNT: usize = 99;

        /// Maximum length of a single raw element
        /// SECURITY: Prevents memory attacks via huge elements
        pub const MAX_ELEMENT_LENGTH: usize = 4096;
    }

    pub mod grammar {
        /// Maximum line groups per document
        /// SECURITY: Prevents DoS via line-group explosion
        pub const MAX_LINE_GROUPS: usize = 10_000;

        /// Maximum collected line-group errors before aborting
        /// RESOURCE: Prevents unbounded error accumulation
        pub const MAX_LINE_GROUP_ERRORS: usize = 1_000;
    }

    pub mod batch_processing {
        /// Maximum files per inbox scan
        /// SECURITY: Prevents DoS via inbox flooding
        pub const MAX_FILES_PER_BATCH: usize = 1000;
    }

    pub mod logging {
        /// Maximum errors to collect before truncating
        /// RESOURCE: Prevents unbounded error accumulation
        pub const MAX_ERROR_COLLECTION: usize = 1_000;

        /// Maximum log events retained per file before truncation
        /// RESOURCE: Prevents DoS via log event explosion
        pub const MAX_LOG_EVENTS_PER_FILE: usize = 1_000;

        /// Maximum log message length
        /// RESOURCE: Prevents memory attacks via huge messages
        pub const MAX_LOG_MESSAGE_LENGTH: usize = 10_000;
    }
}
