//! The single HTML page. Generated text is inserted with `textContent`, so
//! model output is always escaped.

pub const INDEX_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>AI Text Generator with CSV Input</title>
<style>
  body { font-family: Arial, sans-serif; background: #f4f4f4; margin: 0; display: flex; justify-content: center; }
  .container { background: #fff; border-radius: 8px; box-shadow: 0 4px 8px rgba(0,0,0,.1); padding: 30px; width: 80%; max-width: 800px; margin: 40px 0; }
  h1 { color: #333; text-align: center; }
  p.lead { color: #666; text-align: center; }
  textarea, input[type=password] { width: 100%; box-sizing: border-box; padding: 12px; border: 1px solid #ccc; border-radius: 4px; font-size: 16px; }
  textarea { min-height: 150px; resize: vertical; }
  button { background: #4CAF50; color: #fff; padding: 12px 24px; border: none; border-radius: 4px; font-size: 18px; cursor: pointer; display: block; margin: 12px auto; }
  button:disabled { background: #9e9e9e; cursor: wait; }
  .output { margin-top: 20px; padding: 15px; border: 1px solid #ddd; border-radius: 4px; background: #f9f9f9; white-space: pre-wrap; }
  .notice { margin-top: 16px; padding: 12px; border-radius: 4px; }
  .notice.success { background: #d4edda; color: #155724; }
  .notice.warning { background: #fff3cd; color: #856404; }
  .notice.error { background: #f8d7da; color: #721c24; }
  table { border-collapse: collapse; margin-top: 8px; font-size: 14px; }
  td, th { border: 1px solid #ddd; padding: 4px 8px; }
  .hidden { display: none; }
</style>
</head>
<body>
<div class="container">
  <h1>AI Text Generator with CSV Input</h1>
  <p class="lead">Enter a prompt, optionally upload a CSV, and the AI will generate a response.</p>

  <section id="credential" class="hidden">
    <label for="token">API token</label>
    <input type="password" id="token" autocomplete="off">
    <button id="save-token">Save token</button>
  </section>
  <div id="credential-notice"></div>

  <section id="form" class="hidden">
    <label for="file">Upload a CSV file</label>
    <input type="file" id="file" accept=".csv,text/csv">
    <div id="upload-notice"></div>
    <div id="preview"></div>

    <p><label for="prompt">Enter your prompt:</label></p>
    <textarea id="prompt"></textarea>
    <button id="generate">Generate</button>
  </section>

  <div id="result-notice"></div>
  <div id="output" class="output hidden"></div>
</div>
<script>
const $ = (id) => document.getElementById(id);

function notice(id, kind, text) {
  const el = $(id);
  el.className = kind ? "notice " + kind : "";
  el.textContent = text || "";
}

function renderPreview(dataset) {
  const holder = $("preview");
  holder.replaceChildren();
  if (!dataset) return;
  const caption = document.createElement("p");
  caption.textContent = "Preview of the data:";
  const table = document.createElement("table");
  const head = table.insertRow();
  for (const c of dataset.columns) {
    const th = document.createElement("th");
    th.textContent = c;
    head.appendChild(th);
  }
  for (const row of dataset.preview) {
    const tr = table.insertRow();
    for (const cell of row) tr.insertCell().textContent = cell;
  }
  holder.append(caption, table);
}

function applyState(s) {
  const userEntered = s.credential_source === "user";
  $("credential").classList.toggle("hidden", !userEntered);
  $("form").classList.toggle("hidden", s.state !== "ready");
  $("generate").disabled = s.state !== "ready";
  if (s.state === "error") {
    notice("credential-notice", "error", "API token problem: " + (s.error || "unknown"));
  } else if (s.state === "no_credential") {
    notice("credential-notice", "warning", "Enter an API token to continue.");
  } else {
    notice("credential-notice");
  }
  renderPreview(s.dataset);
}

async function call(method, url, body, headers) {
  const res = await fetch(url, { method, body, headers });
  let data = null;
  try { data = await res.json(); } catch (_) {}
  return { ok: res.ok, data };
}

async function refresh() {
  const { data } = await call("GET", "/api/state");
  if (data) applyState(data);
}

$("save-token").onclick = async () => {
  const { data } = await call("POST", "/api/credential",
    JSON.stringify({ token: $("token").value }), { "content-type": "application/json" });
  $("token").value = "";
  if (data && data.state) applyState(data);
  else await refresh();
};

$("file").onchange = async () => {
  const file = $("file").files[0];
  if (!file) {
    await call("DELETE", "/api/dataset");
    notice("upload-notice");
    renderPreview(null);
    return;
  }
  const { ok, data } = await call("POST", "/api/dataset?name=" + encodeURIComponent(file.name), file,
    { "content-type": "text/csv" });
  if (ok) {
    notice("upload-notice", "success", data.message);
    renderPreview(data.dataset);
  } else {
    notice("upload-notice", "error", data ? data.error : "Upload failed");
    renderPreview(null);
  }
};

$("generate").onclick = async () => {
  const button = $("generate");
  button.disabled = true;
  button.textContent = "Generating...";
  notice("result-notice");
  $("output").classList.add("hidden");
  try {
    const { ok, data } = await call("POST", "/api/generate",
      JSON.stringify({ prompt: $("prompt").value }), { "content-type": "application/json" });
    if (ok) {
      $("output").textContent = data.output;
      $("output").classList.remove("hidden");
    } else if (data && data.kind === "empty_prompt") {
      notice("result-notice", "warning", data.error);
    } else {
      notice("result-notice", "error", data ? data.error : "Request failed");
    }
  } finally {
    button.textContent = "Generate";
    await refresh();
  }
};

refresh();
</script>
</body>
</html>
"#;
