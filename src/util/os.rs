use std::{fs, io, path::Path};

pub fn mk_writable_dir(dirpath: &Path) -> io::Result<()> {
    fs::create_dir_all(dirpath)?;

    let mut perms = fs::metadata(dirpath)?.permissions();
    perms.set_readonly(false);
    #[cfg(unix)]
    {
        // Does not apply to Windows
        use std::os::unix::fs::PermissionsExt;
        perms.set_mode(0o700);
    }
    fs::set_permissions(dirpath, perms)
}
