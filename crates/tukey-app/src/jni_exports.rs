// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// JNI entry points for the Android host.
//
// The hosting Activity declares these as `native` methods on
// `com.tukey.app.NativeBridge`:
//
//   static native boolean nativeInit(Context context, String filesDir);
//   static native String  entryUrl();
//   static native String  bridgeName();
//   static native boolean saveFile(String content, String filename, String mimeType);
//   static native boolean saveBase64File(String base64, String filename, String mimeType);
//   static native void    showToast(String message);
//   static native boolean isBridgeActive();
//   static native int     drainUiEvents();
//   static native String  interceptDownload(String url);
//   static native void    downloadOpenFailed(String url);
//   static native void    beginFileChooser(ValueCallback<Uri[]> callback);
//   static native void    completeFileChooser(boolean ok, String uri);
//   static native void    fileChooserFailed();
//
// and implements one plain static method that native code calls:
//
//   static void requestUiDrain() {
//       MAIN_HANDLER.post(NativeBridge::drainUiEvents);
//   }
//
// The shell calls `requestUiDrain` after every toast it queues, from whatever
// thread queued it, so toasts are shown on the main looper without polling.
// The Activity loads `entryUrl()` and registers its `@JavascriptInterface`
// object under `bridgeName()`; those methods forward to the bridge exports.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, OnceLock};

use jni::objects::{GlobalRef, JClass, JObject, JString, JValue};
use jni::sys::{jboolean, jint, jsize, jstring, JNI_FALSE, JNI_TRUE};
use jni::{JNIEnv, JavaVM};

use tukey_bridge::traits::PlatformBridge;
use tukey_core::ShellConfig;
use tukey_shell::chooser::{ChooserCallback, ChooserOutcome};
use tukey_shell::download::DownloadAction;
use tukey_shell::UiEvents;

use crate::services::shell::Shell;

static SHELL: OnceLock<Shell> = OnceLock::new();
static UI_EVENTS: Mutex<Option<UiEvents>> = Mutex::new(None);
static JAVA_VM: OnceLock<JavaVM> = OnceLock::new();
/// Application context handed to ndk_context; set at most once per process.
static APP_CONTEXT: Mutex<Option<GlobalRef>> = Mutex::new(None);
/// `com.tukey.app.NativeBridge`, kept because `FindClass` on a worker thread
/// cannot see application classes.
static BRIDGE_CLASS: OnceLock<GlobalRef> = OnceLock::new();

fn shell() -> Option<&'static Shell> {
    let shell = SHELL.get();
    if shell.is_none() {
        tracing::warn!("bridge call before nativeInit");
    }
    shell
}

fn as_jboolean(value: bool) -> jboolean {
    if value { JNI_TRUE } else { JNI_FALSE }
}

/// Read a Java string; `null` maps to `None`.
fn read_string(env: &mut JNIEnv<'_>, value: &JString<'_>) -> Option<String> {
    if value.is_null() {
        return None;
    }
    match env.get_string(value) {
        Ok(s) => Some(s.into()),
        Err(e) => {
            tracing::warn!(error = %e, "could not read Java string");
            None
        }
    }
}

/// New Java string, or `null` if it could not be created.
fn to_jstring(env: &mut JNIEnv<'_>, value: &str) -> jstring {
    match env.new_string(value) {
        Ok(s) => s.into_raw(),
        Err(e) => {
            tracing::warn!(error = %e, "could not create Java string");
            std::ptr::null_mut()
        }
    }
}

// ---------------------------------------------------------------------------
// Start-up
// ---------------------------------------------------------------------------

#[unsafe(no_mangle)]
pub extern "system" fn Java_com_tukey_app_NativeBridge_nativeInit<'local>(
    mut env: JNIEnv<'local>,
    class: JClass<'local>,
    context: JObject<'local>,
    files_dir: JString<'local>,
) -> jboolean {
    if SHELL.get().is_some() {
        return JNI_TRUE;
    }
    crate::init_logging();

    if let Err(e) = register_context(&mut env, &context) {
        clear_exception(&mut env, &e);
        tracing::error!(error = %e, "could not register Android context");
        return JNI_FALSE;
    }
    if BRIDGE_CLASS.get().is_none() {
        match env.new_global_ref(&class) {
            Ok(class) => {
                let _ = BRIDGE_CLASS.set(class);
            }
            Err(e) => tracing::warn!(error = %e, "could not retain NativeBridge class"),
        }
    }

    let data_dir = read_string(&mut env, &files_dir)
        .map(PathBuf::from)
        .unwrap_or_else(std::env::temp_dir);
    let config = ShellConfig::load_or_init(&data_dir);
    let platform: Arc<dyn PlatformBridge> = Arc::from(tukey_bridge::platform_bridge());

    match Shell::init(platform, config) {
        Ok((shell, events)) => {
            shell.ui().set_waker(request_ui_drain);
            *UI_EVENTS.lock().expect("UI events lock poisoned") = Some(events);
            let _ = SHELL.set(shell);
            JNI_TRUE
        }
        Err(e) => {
            tracing::error!(error = %e, "shell initialisation failed");
            JNI_FALSE
        }
    }
}

/// Hand the VM and the application context to ndk_context, which the
/// platform bridge reads on every JNI call.
///
/// The application context outlives any Activity, so a recreated Activity
/// never leaves the bridge holding a destroyed one. ndk_context accepts a
/// single registration per process; later calls are no-ops.
fn register_context(env: &mut JNIEnv<'_>, context: &JObject<'_>) -> jni::errors::Result<()> {
    let mut registered = APP_CONTEXT.lock().expect("context lock poisoned");
    if registered.is_some() {
        return Ok(());
    }

    let vm = env.get_java_vm()?;
    let app_context = env
        .call_method(context, "getApplicationContext", "()Landroid/content/Context;", &[])?
        .l()?;
    let app_context = env.new_global_ref(app_context)?;

    // SAFETY: the VM pointer is valid for the life of the process, and the
    // context pointer stays valid while `APP_CONTEXT` holds its global ref,
    // which is never released. The lock above makes this run once.
    unsafe {
        ndk_context::initialize_android_context(
            vm.get_java_vm_pointer().cast(),
            app_context.as_obj().as_raw().cast(),
        )
    };
    *registered = Some(app_context);
    let _ = JAVA_VM.set(vm);
    Ok(())
}

fn clear_exception(env: &mut JNIEnv<'_>, e: &jni::errors::Error) {
    if matches!(e, jni::errors::Error::JavaException) {
        let _ = env.exception_clear();
    }
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_com_tukey_app_NativeBridge_entryUrl<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
) -> jstring {
    match shell() {
        Some(shell) => to_jstring(&mut env, &shell.config().entry_url),
        None => std::ptr::null_mut(),
    }
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_com_tukey_app_NativeBridge_bridgeName<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
) -> jstring {
    match shell() {
        Some(shell) => to_jstring(&mut env, &shell.config().bridge_name),
        None => std::ptr::null_mut(),
    }
}

// ---------------------------------------------------------------------------
// Bridge surface
// ---------------------------------------------------------------------------

#[unsafe(no_mangle)]
pub extern "system" fn Java_com_tukey_app_NativeBridge_saveFile<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    content: JString<'local>,
    filename: JString<'local>,
    mime_type: JString<'local>,
) -> jboolean {
    let Some(shell) = shell() else {
        return JNI_FALSE;
    };
    let Some(content) = read_string(&mut env, &content) else {
        tracing::warn!("saveFile called without content");
        return JNI_FALSE;
    };
    let filename = read_string(&mut env, &filename).unwrap_or_default();
    let mime_type = read_string(&mut env, &mime_type);

    let result = shell
        .bridge()
        .save_text(&content, &filename, mime_type.as_deref());
    as_jboolean(result.success)
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_com_tukey_app_NativeBridge_saveBase64File<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    base64_content: JString<'local>,
    filename: JString<'local>,
    mime_type: JString<'local>,
) -> jboolean {
    let Some(shell) = shell() else {
        return JNI_FALSE;
    };
    let Some(base64_content) = read_string(&mut env, &base64_content) else {
        tracing::warn!("saveBase64File called without content");
        return JNI_FALSE;
    };
    let filename = read_string(&mut env, &filename).unwrap_or_default();
    let mime_type = read_string(&mut env, &mime_type);

    let result = shell
        .bridge()
        .save_base64(&base64_content, &filename, mime_type.as_deref());
    as_jboolean(result.success)
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_com_tukey_app_NativeBridge_showToast<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    message: JString<'local>,
) {
    if let Some(shell) = shell() {
        let message = read_string(&mut env, &message).unwrap_or_default();
        shell.bridge().notify(&message);
    }
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_com_tukey_app_NativeBridge_isBridgeActive<'local>(
    _env: JNIEnv<'local>,
    _class: JClass<'local>,
) -> jboolean {
    as_jboolean(shell().is_some_and(|shell| shell.bridge().is_bridge_active()))
}

/// Show every queued toast. Must run on the main looper; the host schedules
/// it from `requestUiDrain`.
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_tukey_app_NativeBridge_drainUiEvents<'local>(
    _env: JNIEnv<'local>,
    _class: JClass<'local>,
) -> jint {
    let Some(shell) = shell() else {
        return 0;
    };
    let platform = shell.platform();
    let mut events = UI_EVENTS.lock().expect("UI events lock poisoned");
    match events.as_mut() {
        Some(events) => events.drain(platform.as_ref()) as jint,
        None => 0,
    }
}

// ---------------------------------------------------------------------------
// Downloads
// ---------------------------------------------------------------------------

/// Returns the script to inject for a `blob:` download, or `null` when the
/// host should open the URL externally.
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_tukey_app_NativeBridge_interceptDownload<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    url: JString<'local>,
) -> jstring {
    let Some(shell) = shell() else {
        return std::ptr::null_mut();
    };
    let url = read_string(&mut env, &url).unwrap_or_default();
    match shell.downloads().intercept(&url) {
        DownloadAction::FetchBlob { script } => to_jstring(&mut env, &script),
        DownloadAction::OpenExternal { .. } => std::ptr::null_mut(),
    }
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_com_tukey_app_NativeBridge_downloadOpenFailed<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    url: JString<'local>,
) {
    if let Some(shell) = shell() {
        let url = read_string(&mut env, &url).unwrap_or_default();
        shell.downloads().report_open_failure(shell.ui(), &url);
    }
}

// ---------------------------------------------------------------------------
// File chooser
// ---------------------------------------------------------------------------

#[unsafe(no_mangle)]
pub extern "system" fn Java_com_tukey_app_NativeBridge_beginFileChooser<'local>(
    env: JNIEnv<'local>,
    _class: JClass<'local>,
    callback: JObject<'local>,
) {
    let Some(shell) = shell() else {
        return;
    };
    let callback = match env.new_global_ref(&callback) {
        Ok(callback) => callback,
        Err(e) => {
            tracing::warn!(error = %e, "could not retain chooser callback");
            return;
        }
    };
    let deliver: ChooserCallback = Box::new(move |selection| {
        if let Err(e) = deliver_selection(&callback, selection) {
            tracing::warn!(error = %e, "could not deliver chooser result");
        }
    });
    shell.chooser().begin(deliver);
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_com_tukey_app_NativeBridge_completeFileChooser<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    ok: jboolean,
    uri: JString<'local>,
) {
    if let Some(shell) = shell() {
        let uri = read_string(&mut env, &uri);
        let outcome = ChooserOutcome::from_activity_result(ok == JNI_TRUE, uri);
        shell.chooser().complete(outcome);
    }
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_com_tukey_app_NativeBridge_fileChooserFailed<'local>(
    _env: JNIEnv<'local>,
    _class: JClass<'local>,
) {
    if let Some(shell) = shell() {
        shell.chooser().abort();
    }
}

/// Ask the host to run `drainUiEvents` on its main looper.
fn request_ui_drain() {
    if let Err(e) = call_request_ui_drain() {
        tracing::warn!(error = %e, "could not schedule UI drain");
    }
}

fn call_request_ui_drain() -> jni::errors::Result<()> {
    let (Some(vm), Some(class)) = (JAVA_VM.get(), BRIDGE_CLASS.get()) else {
        return Err(jni::errors::Error::NullPtr("NativeBridge not registered"));
    };
    let mut env = vm.attach_current_thread()?;
    let class: &JClass<'_> = class.as_obj().into();
    let called = env.call_static_method(class, "requestUiDrain", "()V", &[]);
    if let Err(e) = &called {
        clear_exception(&mut env, e);
    }
    called.map(|_| ())
}

/// Call `ValueCallback<Uri[]>.onReceiveValue` with the selection, or `null`
/// on cancel.
fn deliver_selection(
    callback: &GlobalRef,
    selection: Option<Vec<String>>,
) -> jni::errors::Result<()> {
    let Some(vm) = JAVA_VM.get() else {
        return Err(jni::errors::Error::NullPtr("JavaVM not registered"));
    };
    let mut env = vm.attach_current_thread()?;

    let value = match selection {
        None => JObject::null(),
        Some(uris) => {
            let uri_class = env.find_class("android/net/Uri")?;
            let array = env.new_object_array(uris.len() as jsize, &uri_class, JObject::null())?;
            for (i, uri) in uris.iter().enumerate() {
                let text = env.new_string(uri)?;
                let parsed = env
                    .call_static_method(
                        &uri_class,
                        "parse",
                        "(Ljava/lang/String;)Landroid/net/Uri;",
                        &[JValue::Object(&text)],
                    )?
                    .l()?;
                env.set_object_array_element(&array, i as jsize, parsed)?;
            }
            JObject::from(array)
        }
    };

    env.call_method(
        callback.as_obj(),
        "onReceiveValue",
        "(Ljava/lang/Object;)V",
        &[JValue::Object(&value)],
    )?;
    Ok(())
}
