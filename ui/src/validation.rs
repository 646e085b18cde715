/// Core validation trait shared by field validators and client-side rules.
///
/// Validators are small values that can be composed: a rule over a whole
/// settings document usually delegates to one or more field validators over
/// `str`.
///
/// # Type Parameters
///
/// * `T` - The type of data being validated (can be unsized like `str`)
///
/// # Examples
///
/// ```
/// use community_settings::validation::Validator;
///
/// struct NoSpaces;
/// impl Validator<str> for NoSpaces {
///     type Error = String;
///
///     fn validate(&self, input: &str) -> Result<(), Self::Error> {
///         if input.contains(' ') {
///             Err("Input cannot contain spaces".to_string())
///         } else {
///             Ok(())
///         }
///     }
/// }
/// ```
pub trait Validator<T: ?Sized> {
    type Error;

    /// Validate the input and return Ok(()) if valid, or Err with validation error
    fn validate(&self, input: &T) -> Result<(), Self::Error>;
}
