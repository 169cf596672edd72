/// Builder-style setter accepting anything convertible into the field type
macro_rules! setter {
    ($field:ident : $ty:ty) => {
        pub fn $field<T>(mut self, $field: T) -> Self
        where
            T: Into<$ty>,
        {
            self.$field = $field.into();
            self
        }
    };
}

/// `page`, `size` and `sort` setters for list requests carrying a `params: PageParams` field
macro_rules! paged {
    () => {
        /// Zero-based page index
        pub fn page(mut self, page: u32) -> Self {
            self.params.page = page;
            self
        }

        pub fn size(mut self, size: u32) -> Self {
            self.params.size = size;
            self
        }

        pub fn sort(mut self, sort: impl Into<String>) -> Self {
            self.params.sort = sort.into();
            self
        }
    };
}

pub(crate) use {paged, setter};
