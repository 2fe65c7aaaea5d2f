/// Macro to create an ID to be used by an [`ObjectStore`](crate::ObjectStore)
#[macro_export]
macro_rules! generate_id_type {
  ($struct_name:ident) => {
    #[derive(Hash, Clone, Copy, Debug, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
    pub struct $struct_name(u32);
    impl $struct_name {
      pub fn new(val: u32) -> Self {
        $struct_name(val)
      }
      pub fn val(&self) -> u32 {
        self.0
      }
    }
    impl std::fmt::Display for $struct_name {
      fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
      }
    }
    impl std::str::FromStr for $struct_name {
      type Err = $crate::IdError<$struct_name>;

      fn from_str(s: &str) -> Result<Self, Self::Err> {
        let val = s.parse::<u32>().map_err(|_e| $crate::IdError::CannotParse(s.to_owned()))?;
        Ok(Self::new(val))
      }
    }
  };
}
