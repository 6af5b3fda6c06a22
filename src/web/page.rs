//! Input page: three titles, one button, a graph frame and status banners.

pub(super) const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width,initial-scale=1">
<title>NextChapter</title>
<style>
@import url('https://fonts.googleapis.com/css2?family=Playfair+Display:wght@400;700&family=Source+Sans+3:wght@300;400;600&display=swap');
*{box-sizing:border-box}
body{margin:0;font-family:'Source Sans 3',sans-serif;display:flex;min-height:100vh;color:#1e1e24}
#sidebar{width:300px;flex-shrink:0;background:#f4f5f7;padding:24px;border-right:1px solid #e0e0e0}
#sidebar h2{font-family:'Playfair Display',serif;margin-top:0}
#sidebar label{display:block;font-weight:600;margin:14px 0 4px}
#sidebar input{width:100%;padding:8px 10px;border:1px solid #ccc;border-radius:6px;font-size:14px}
#analyze{margin-top:20px;width:100%;padding:10px;border:none;border-radius:6px;background:#FF6B6B;color:#fff;font-size:15px;font-weight:600;cursor:pointer}
#analyze:disabled{opacity:.6;cursor:wait}
#main{flex:1;padding:32px 40px 0}
#main h1{font-family:'Playfair Display',serif;margin-top:0}
.banner{padding:12px 16px;border-radius:8px;margin-bottom:16px;display:none}
.banner.show{display:block}
#loading{background:#eef6ff;border:1px solid #c9e0ff}
#success{background:#e9f9ef;border:1px solid #b9e8c9}
#error{background:#fdecec;border:1px solid #f5c2c2}
#graph{width:100%;height:770px;border:none;display:none}
</style>
</head>
<body>
<aside id="sidebar">
  <h2>📚 Book Titles</h2>
  <form id="seeds">
    <label for="book1">First Book</label>
    <input id="book1" name="book1" placeholder="e.g., The Stranger" required>
    <label for="book2">Second Book</label>
    <input id="book2" name="book2" placeholder="e.g., The Unbearable Lightness of Being" required>
    <label for="book3">Third Book</label>
    <input id="book3" name="book3" placeholder="e.g., 1984" required>
    <button id="analyze" type="submit">Generate Network</button>
  </form>
</aside>
<main id="main">
  <h1>🌌 NextChapter</h1>
  <p id="intro">Enter three books and NextChapter will analyze their <strong>writing style, philosophy, and atmosphere</strong> to create your personalized reading map.<br><br>👈 Enter 3 books in the left sidebar and click the button to begin.</p>
  <div id="loading" class="banner"><strong>NextChapter is mapping the universe of your books... 🚀</strong><br>Building your recommendation network. This may take a moment.</div>
  <div id="success" class="banner">✅ Analysis complete! Hover over the nodes to explore 📚</div>
  <div id="error" class="banner"></div>
  <iframe id="graph" title="Reading map"></iframe>
</main>
<script>
const form = document.getElementById("seeds");
const button = document.getElementById("analyze");
const show = (id, on) => document.getElementById(id).classList.toggle("show", on);

form.addEventListener("submit", async (event) => {
  event.preventDefault();
  const titles = ["book1", "book2", "book3"].map((id) => document.getElementById(id).value.trim());
  const frame = document.getElementById("graph");
  const error = document.getElementById("error");

  document.getElementById("intro").style.display = "none";
  show("success", false);
  show("error", false);
  show("loading", true);
  button.disabled = true;

  try {
    const response = await fetch("/api/analyze", {
      method: "POST",
      headers: { "Content-Type": "application/json" },
      body: JSON.stringify({ titles }),
    });
    const result = await response.json();
    if (result.status === "ok") {
      frame.srcdoc = result.html;
      frame.style.display = "block";
      show("success", true);
    } else {
      frame.style.display = "none";
      error.textContent = "❌ " + result.message;
      show("error", true);
    }
  } catch (err) {
    error.textContent = "❌ Communication error: " + err;
    show("error", true);
  } finally {
    show("loading", false);
    button.disabled = false;
  }
});
</script>
</body>
</html>
"##;
