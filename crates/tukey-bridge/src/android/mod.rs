// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Android platform bridge via JNI.
//
// Requires the Android NDK and targets `aarch64-linux-android` or
// `armv7-linux-androideabi`. The hosting Activity must have initialised
// `ndk_context` (see the `nativeInit` export in tukey-app) before any method
// here is called.
//
// ## Threading
//
// Content-index and filesystem calls attach the calling thread to the VM and
// may run on any thread. `show_toast` must only be called from the main
// looper thread; the shell guarantees this by routing toasts through its UI
// event queue, which the Activity drains on the main thread.

#![cfg(target_os = "android")]

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use jni::objects::{GlobalRef, JObject, JString, JValue};
use jni::{JNIEnv, JavaVM};

use tukey_core::error::{Result, TukeyError};
use tukey_core::types::{ContentUri, DownloadEntry, StorageCapability, ToastDuration};

use crate::traits::*;

// ---------------------------------------------------------------------------
// JNI bootstrap helpers
// ---------------------------------------------------------------------------

/// First API level with `MediaStore.Downloads` (Android 10, "Q").
const API_LEVEL_Q: i32 = 29;

/// Largest slice handed to a single `OutputStream.write` call.
const WRITE_CHUNK: usize = 64 * 1024;

// android.widget.Toast durations
const LENGTH_SHORT: i32 = 0;
const LENGTH_LONG: i32 = 1;

static JAVA_VM: OnceLock<JavaVM> = OnceLock::new();

/// The process-wide `JavaVM`, taken from `ndk_context` on first use.
fn java_vm() -> Result<&'static JavaVM> {
    if let Some(vm) = JAVA_VM.get() {
        return Ok(vm);
    }
    let ctx = ndk_context::android_context();
    // SAFETY: `ctx.vm()` returns the `JavaVM*` registered with ndk_context.
    // The pointer is valid for the lifetime of the process.
    let vm = unsafe { JavaVM::from_raw(ctx.vm().cast()) }
        .map_err(|e| TukeyError::Bridge(format!("failed to obtain JavaVM: {e}")))?;
    Ok(JAVA_VM.get_or_init(|| vm))
}

/// Obtain a [`JNIEnv`] for the current thread, attaching it if needed.
fn jni_env() -> Result<JNIEnv<'static>> {
    java_vm()?
        .attach_current_thread_permanently()
        .map_err(|e| TukeyError::Bridge(format!("failed to attach JNI thread: {e}")))
}

/// Obtain the hosting Android `Context` as a [`JObject`].
fn activity() -> Result<JObject<'static>> {
    let ptr = ndk_context::android_context().context();
    if ptr.is_null() {
        return Err(TukeyError::Bridge(
            "Android context is null — shell not initialised".into(),
        ));
    }
    // SAFETY: ndk_context holds a global reference to the hosting Context.
    Ok(unsafe { JObject::from_raw(ptr.cast()) })
}

/// Describe a JNI failure and clear any pending Java exception so the next
/// call on this thread starts clean.
fn describe(env: &mut JNIEnv<'_>, context: &str, e: jni::errors::Error) -> String {
    if matches!(e, jni::errors::Error::JavaException) {
        let _ = env.exception_describe();
        let _ = env.exception_clear();
    }
    format!("{context}: {e}")
}

fn jni_err(env: &mut JNIEnv<'_>, context: &str, e: jni::errors::Error) -> TukeyError {
    TukeyError::Bridge(describe(env, context, e))
}

// ---------------------------------------------------------------------------
// Bridge struct
// ---------------------------------------------------------------------------

/// Android implementation of the Tukey platform bridge.
///
/// Construction does **not** touch JNI. The API level is read lazily on the
/// first capability query and cached.
pub struct AndroidBridge {
    sdk_int: OnceLock<Option<i32>>,
    index: Arc<MediaStoreIndex>,
}

impl AndroidBridge {
    pub fn new() -> Self {
        Self {
            sdk_int: OnceLock::new(),
            index: Arc::new(MediaStoreIndex),
        }
    }

    fn sdk_int(&self) -> Option<i32> {
        *self.sdk_int.get_or_init(|| match read_sdk_int() {
            Ok(level) => {
                tracing::info!(sdk_int = level, "Android: detected API level");
                Some(level)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Android: could not read API level");
                None
            }
        })
    }
}

impl Default for AndroidBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformBridge for AndroidBridge {
    fn platform_name(&self) -> &str {
        "Android"
    }

    fn storage_capability(&self) -> StorageCapability {
        match self.sdk_int() {
            Some(level) if level >= API_LEVEL_Q => StorageCapability::IndexedDownloads,
            _ => StorageCapability::LegacyFilesystem,
        }
    }

    /// `Environment.getExternalStoragePublicDirectory(DIRECTORY_DOWNLOADS)`.
    fn public_downloads_dir(&self) -> Result<PathBuf> {
        let mut env = jni_env()?;

        let dir_name: JObject = env
            .get_static_field(
                "android/os/Environment",
                "DIRECTORY_DOWNLOADS",
                "Ljava/lang/String;",
            )
            .map_err(|e| jni_err(&mut env, "Environment.DIRECTORY_DOWNLOADS", e))?
            .l()
            .map_err(|e| jni_err(&mut env, "DIRECTORY_DOWNLOADS->l", e))?;

        let dir: JObject = env
            .call_static_method(
                "android/os/Environment",
                "getExternalStoragePublicDirectory",
                "(Ljava/lang/String;)Ljava/io/File;",
                &[JValue::Object(&dir_name)],
            )
            .map_err(|e| jni_err(&mut env, "getExternalStoragePublicDirectory", e))?
            .l()
            .map_err(|e| jni_err(&mut env, "getExternalStoragePublicDirectory->l", e))?;

        let path: JObject = env
            .call_method(&dir, "getAbsolutePath", "()Ljava/lang/String;", &[])
            .map_err(|e| jni_err(&mut env, "File.getAbsolutePath", e))?
            .l()
            .map_err(|e| jni_err(&mut env, "getAbsolutePath->l", e))?;

        let path: String = env
            .get_string(&JString::from(path))
            .map_err(|e| jni_err(&mut env, "get_string(path)", e))?
            .into();

        Ok(PathBuf::from(path))
    }

    fn content_index(&self) -> Option<Arc<dyn ContentIndex>> {
        Some(self.index.clone())
    }
}

// ---------------------------------------------------------------------------
// NativeToast — android.widget.Toast
// ---------------------------------------------------------------------------

impl NativeToast for AndroidBridge {
    fn show_toast(&self, message: &str, duration: ToastDuration) -> Result<()> {
        let mut env = jni_env()?;
        let activity = activity()?;

        let length = match duration {
            ToastDuration::Short => LENGTH_SHORT,
            ToastDuration::Long => LENGTH_LONG,
        };

        let j_message: JString = env
            .new_string(message)
            .map_err(|e| jni_err(&mut env, "new_string(message)", e))?;

        // Toast.makeText(context, text, length).show()
        let toast: JObject = env
            .call_static_method(
                "android/widget/Toast",
                "makeText",
                "(Landroid/content/Context;Ljava/lang/CharSequence;I)Landroid/widget/Toast;",
                &[
                    JValue::Object(&activity),
                    JValue::Object(&j_message),
                    JValue::Int(length),
                ],
            )
            .map_err(|e| jni_err(&mut env, "Toast.makeText", e))?
            .l()
            .map_err(|e| jni_err(&mut env, "makeText->l", e))?;

        env.call_method(&toast, "show", "()V", &[])
            .map_err(|e| jni_err(&mut env, "Toast.show", e))?;

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ContentIndex — MediaStore.Downloads
// ---------------------------------------------------------------------------

/// `MediaStore.Downloads` accessed through the Activity's `ContentResolver`.
pub struct MediaStoreIndex;

impl ContentIndex for MediaStoreIndex {
    /// `resolver.insert(MediaStore.Downloads.EXTERNAL_CONTENT_URI, values)`.
    fn insert_download(&self, entry: &DownloadEntry) -> Result<Option<ContentUri>> {
        let mut env = jni_env()?;
        let activity = activity()?;

        tracing::debug!(
            display_name = %entry.display_name,
            mime = %entry.mime_type,
            "Android: inserting MediaStore download entry"
        );

        let values: JObject = env
            .new_object("android/content/ContentValues", "()V", &[])
            .map_err(|e| jni_err(&mut env, "new ContentValues", e))?;

        // MediaStore.MediaColumns column names
        put_string(&mut env, &values, "_display_name", &entry.display_name)?;
        put_string(&mut env, &values, "mime_type", &entry.mime_type)?;
        put_string(&mut env, &values, "relative_path", &entry.relative_path)?;

        let collection: JObject = env
            .get_static_field(
                "android/provider/MediaStore$Downloads",
                "EXTERNAL_CONTENT_URI",
                "Landroid/net/Uri;",
            )
            .map_err(|e| jni_err(&mut env, "Downloads.EXTERNAL_CONTENT_URI", e))?
            .l()
            .map_err(|e| jni_err(&mut env, "EXTERNAL_CONTENT_URI->l", e))?;

        let resolver = content_resolver(&mut env, &activity)?;

        let uri: JObject = env
            .call_method(
                &resolver,
                "insert",
                "(Landroid/net/Uri;Landroid/content/ContentValues;)Landroid/net/Uri;",
                &[JValue::Object(&collection), JValue::Object(&values)],
            )
            .map_err(|e| TukeyError::Registration(describe(&mut env, "ContentResolver.insert", e)))?
            .l()
            .map_err(|e| jni_err(&mut env, "insert->l", e))?;

        if uri.is_null() {
            return Ok(None);
        }

        let uri_string: JObject = env
            .call_method(&uri, "toString", "()Ljava/lang/String;", &[])
            .map_err(|e| jni_err(&mut env, "Uri.toString", e))?
            .l()
            .map_err(|e| jni_err(&mut env, "toString->l", e))?;

        let uri_string: String = env
            .get_string(&JString::from(uri_string))
            .map_err(|e| jni_err(&mut env, "get_string(uri)", e))?
            .into();

        Ok(Some(ContentUri(uri_string)))
    }

    /// `resolver.openOutputStream(uri)`, wrapped as a [`Write`].
    fn open_writer(&self, uri: &ContentUri) -> Result<Option<Box<dyn Write + Send>>> {
        let mut env = jni_env()?;
        let activity = activity()?;

        let j_uri_str: JString = env
            .new_string(&uri.0)
            .map_err(|e| jni_err(&mut env, "new_string(uri)", e))?;

        let uri_obj: JObject = env
            .call_static_method(
                "android/net/Uri",
                "parse",
                "(Ljava/lang/String;)Landroid/net/Uri;",
                &[JValue::Object(&j_uri_str)],
            )
            .map_err(|e| jni_err(&mut env, "Uri.parse", e))?
            .l()
            .map_err(|e| jni_err(&mut env, "Uri.parse->l", e))?;

        let resolver = content_resolver(&mut env, &activity)?;

        let stream: JObject = env
            .call_method(
                &resolver,
                "openOutputStream",
                "(Landroid/net/Uri;)Ljava/io/OutputStream;",
                &[JValue::Object(&uri_obj)],
            )
            .map_err(|e| TukeyError::Handle(describe(&mut env, "openOutputStream", e)))?
            .l()
            .map_err(|e| jni_err(&mut env, "openOutputStream->l", e))?;

        if stream.is_null() {
            return Ok(None);
        }

        let stream = env
            .new_global_ref(&stream)
            .map_err(|e| jni_err(&mut env, "new_global_ref(stream)", e))?;

        Ok(Some(Box::new(JavaOutputStream { stream })))
    }
}

/// A `java.io.OutputStream` held as a global reference.
///
/// The stream is closed on drop; callers flush explicitly before that.
struct JavaOutputStream {
    stream: GlobalRef,
}

fn to_io(e: TukeyError) -> io::Error {
    io::Error::other(e.to_string())
}

impl Write for JavaOutputStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let chunk = &buf[..buf.len().min(WRITE_CHUNK)];
        let mut env = jni_env().map_err(to_io)?;

        let array = env
            .byte_array_from_slice(chunk)
            .map_err(|e| to_io(jni_err(&mut env, "byte_array_from_slice", e)))?;

        env.call_method(
            self.stream.as_obj(),
            "write",
            "([BII)V",
            &[
                JValue::Object(&array),
                JValue::Int(0),
                JValue::Int(chunk.len() as i32),
            ],
        )
        .map_err(|e| to_io(jni_err(&mut env, "OutputStream.write", e)))?;

        let _ = env.delete_local_ref(array);
        Ok(chunk.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut env = jni_env().map_err(to_io)?;
        env.call_method(self.stream.as_obj(), "flush", "()V", &[])
            .map_err(|e| to_io(jni_err(&mut env, "OutputStream.flush", e)))?;
        Ok(())
    }
}

impl Drop for JavaOutputStream {
    fn drop(&mut self) {
        let result = jni_env().and_then(|mut env| {
            env.call_method(self.stream.as_obj(), "close", "()V", &[])
                .map(|_| ())
                .map_err(|e| jni_err(&mut env, "OutputStream.close", e))
        });
        if let Err(e) = result {
            tracing::warn!(error = %e, "Android: closing output stream failed");
        }
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// `Build.VERSION.SDK_INT`.
fn read_sdk_int() -> Result<i32> {
    let mut env = jni_env()?;
    env.get_static_field("android/os/Build$VERSION", "SDK_INT", "I")
        .map_err(|e| jni_err(&mut env, "Build.VERSION.SDK_INT", e))?
        .i()
        .map_err(|e| jni_err(&mut env, "SDK_INT->i", e))
}

fn content_resolver<'a>(env: &mut JNIEnv<'a>, activity: &JObject<'_>) -> Result<JObject<'a>> {
    env.call_method(
        activity,
        "getContentResolver",
        "()Landroid/content/ContentResolver;",
        &[],
    )
    .map_err(|e| jni_err(env, "getContentResolver", e))?
    .l()
    .map_err(|e| jni_err(env, "getContentResolver->l", e))
}

/// `values.put(key, value)` for a string column.
fn put_string(env: &mut JNIEnv<'_>, values: &JObject<'_>, key: &str, value: &str) -> Result<()> {
    let j_key: JString = env
        .new_string(key)
        .map_err(|e| jni_err(env, "new_string(key)", e))?;
    let j_value: JString = env
        .new_string(value)
        .map_err(|e| jni_err(env, "new_string(value)", e))?;

    env.call_method(
        values,
        "put",
        "(Ljava/lang/String;Ljava/lang/String;)V",
        &[JValue::Object(&j_key), JValue::Object(&j_value)],
    )
    .map_err(|e| jni_err(env, "ContentValues.put", e))?;

    Ok(())
}
