//! File name helpers for uploaded files.
//!
//! Browsers send the client-side file name with an upload. Some (older IE,
//! some mobile clients) send a full path, so everything before the last
//! separator is discarded before the name is used for anything.

/// Return the final component of a client-supplied file name.
///
/// Both `/` and `\` are treated as separators.
///
/// # Examples
///
/// ```
/// use pictura_common::paths::client_file_name;
///
/// assert_eq!(client_file_name("photo.jpg"), "photo.jpg");
/// assert_eq!(client_file_name("C:\\Users\\me\\photo.jpg"), "photo.jpg");
/// assert_eq!(client_file_name("../../etc/passwd"), "passwd");
/// ```
pub fn client_file_name(name: &str) -> &str {
    name.rsplit(&['/', '\\'][..]).next().unwrap_or(name)
}

/// Return the extension of a file name: the text after the last `.`.
///
/// Returns `None` when the name has no dot or ends with one.
///
/// # Examples
///
/// ```
/// use pictura_common::paths::file_extension;
///
/// assert_eq!(file_extension("cat.png"), Some("png"));
/// assert_eq!(file_extension("archive.tar.gz"), Some("gz"));
/// assert_eq!(file_extension("README"), None);
/// assert_eq!(file_extension("trailing."), None);
/// ```
pub fn file_extension(name: &str) -> Option<&str> {
    let name = client_file_name(name);
    let (_, ext) = name.rsplit_once('.')?;
    if ext.is_empty() {
        None
    } else {
        Some(ext)
    }
}
